//! AST selector/walker (C2, spec §4.2): depth-first, post-order traversal
//! from the translation-unit root, collecting declaration cursors that
//! belong to the input header itself.

use std::path::Path;

use reflectgen_model::{Cursor, CursorKind};
use tracing::{debug, instrument};

/// Walks `root`'s subtree and returns the class/struct definition cursors
/// whose canonicalized source file equals `canonical_input` (spec invariant
/// 1/2), in depth-first post-order (spec invariant "deterministic source
/// order" falls out of this — a child definition is always visited before
/// its enclosing declaration, and siblings preserve declaration order).
#[instrument(skip(root))]
pub fn select_classes<C: Cursor>(root: &C, canonical_input: &Path) -> Vec<C> {
    let mut out = Vec::new();
    visit(root, canonical_input, &mut out);
    debug!(count = out.len(), "classes selected from input header");
    out
}

fn visit<C: Cursor>(node: &C, canonical_input: &Path, out: &mut Vec<C>) {
    for child in node.children() {
        visit(&child, canonical_input, out);
    }

    if !matches!(node.kind(), CursorKind::ClassDecl | CursorKind::StructDecl) {
        return;
    }
    if !node.is_definition() {
        return;
    }

    let location = node.location();
    if location.file.is_empty() {
        return;
    }
    let node_path = Path::new(&location.file);
    let canonical_node = node_path
        .canonicalize()
        .unwrap_or_else(|_| node_path.to_path_buf());
    if canonical_node != canonical_input {
        return;
    }

    out.push(node.clone());
}

#[cfg(test)]
mod tests {
    use super::*;
    use reflectgen_model::{Access, SourceLocation};
    use std::rc::Rc;

    #[derive(Clone)]
    struct MockCursor(Rc<Node>);

    struct Node {
        kind: CursorKind,
        file: String,
        is_definition: bool,
        children: Vec<MockCursor>,
    }

    impl MockCursor {
        fn new(kind: CursorKind, file: &str, is_definition: bool, children: Vec<MockCursor>) -> Self {
            MockCursor(Rc::new(Node {
                kind,
                file: file.to_string(),
                is_definition,
                children,
            }))
        }
    }

    impl Cursor for MockCursor {
        fn kind(&self) -> CursorKind {
            self.0.kind
        }
        fn spelling(&self) -> String {
            String::new()
        }
        fn canonical_type_spelling(&self) -> String {
            String::new()
        }
        fn raw_comment(&self) -> Option<String> {
            None
        }
        fn access(&self) -> Access {
            Access::None
        }
        fn children(&self) -> Vec<Self> {
            self.0.children.clone()
        }
        fn is_definition(&self) -> bool {
            self.0.is_definition
        }
        fn location(&self) -> SourceLocation {
            SourceLocation {
                file: self.0.file.clone(),
                line: 1,
                column: 1,
            }
        }
        fn is_static_method(&self) -> bool {
            false
        }
        fn result_type_spelling(&self) -> String {
            "void".to_string()
        }
        fn param_type_spellings(&self) -> Vec<String> {
            vec![]
        }
        fn definition(&self) -> Option<Self> {
            None
        }
    }

    #[test]
    fn declarations_from_other_files_are_excluded() {
        let included = MockCursor::new(CursorKind::StructDecl, "/inc/other.h", true, vec![]);
        let own = MockCursor::new(CursorKind::StructDecl, "/in/input.h", true, vec![]);
        let root = MockCursor::new(
            CursorKind::TranslationUnit,
            "",
            false,
            vec![included, own],
        );
        let selected = select_classes(&root, Path::new("/in/input.h"));
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].0.file, "/in/input.h");
    }

    #[test]
    fn forward_declarations_are_excluded() {
        let fwd = MockCursor::new(CursorKind::ClassDecl, "/in/input.h", false, vec![]);
        let root = MockCursor::new(CursorKind::TranslationUnit, "", false, vec![fwd]);
        assert!(select_classes(&root, Path::new("/in/input.h")).is_empty());
    }
}
