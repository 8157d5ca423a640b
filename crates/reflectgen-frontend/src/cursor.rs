//! `ClangCursor`: the concrete `reflectgen_model::Cursor` implementation
//! over `clang::Entity` (spec §3, "Cursor").

use clang::{Accessibility, Entity, EntityKind};
use reflectgen_model::{Access, Cursor, CursorKind, SourceLocation};

#[derive(Clone, Copy)]
pub struct ClangCursor<'tu>(pub Entity<'tu>);

impl<'tu> ClangCursor<'tu> {
    pub fn new(entity: Entity<'tu>) -> Self {
        Self(entity)
    }

    pub fn entity(&self) -> Entity<'tu> {
        self.0
    }
}

impl<'tu> Cursor for ClangCursor<'tu> {
    fn kind(&self) -> CursorKind {
        match self.0.get_kind() {
            EntityKind::ClassDecl => CursorKind::ClassDecl,
            EntityKind::StructDecl => CursorKind::StructDecl,
            EntityKind::UnionDecl => CursorKind::UnionDecl,
            EntityKind::FieldDecl => CursorKind::FieldDecl,
            EntityKind::Method => CursorKind::MethodDecl,
            EntityKind::BaseSpecifier => CursorKind::BaseSpecifier,
            EntityKind::TemplateRef => CursorKind::TemplateRef,
            EntityKind::ParmDecl => CursorKind::Parameter,
            EntityKind::TranslationUnit => CursorKind::TranslationUnit,
            _ => CursorKind::Other,
        }
    }

    fn spelling(&self) -> String {
        self.0.get_name().unwrap_or_default()
    }

    fn canonical_type_spelling(&self) -> String {
        self.0
            .get_type()
            .map(|t| t.get_canonical_type().get_display_name())
            .unwrap_or_default()
    }

    fn raw_comment(&self) -> Option<String> {
        self.0.get_comment()
    }

    fn access(&self) -> Access {
        match self.0.get_accessibility() {
            Some(Accessibility::Public) => Access::Public,
            Some(Accessibility::Protected) => Access::Protected,
            Some(Accessibility::Private) => Access::Private,
            None => Access::Invalid,
        }
    }

    fn children(&self) -> Vec<Self> {
        self.0.get_children().into_iter().map(ClangCursor).collect()
    }

    fn is_definition(&self) -> bool {
        self.0.is_definition()
    }

    fn location(&self) -> SourceLocation {
        let Some(loc) = self.0.get_location() else {
            return SourceLocation {
                file: String::new(),
                line: 0,
                column: 0,
            };
        };
        let spelling = loc.get_spelling_location();
        SourceLocation {
            file: spelling
                .file
                .map(|f| f.get_path().display().to_string())
                .unwrap_or_default(),
            line: spelling.line,
            column: spelling.column,
        }
    }

    fn is_static_method(&self) -> bool {
        self.0.is_static_method()
    }

    fn result_type_spelling(&self) -> String {
        self.0
            .get_result_type()
            .map(|t| t.get_display_name())
            .unwrap_or_default()
    }

    fn param_type_spellings(&self) -> Vec<String> {
        self.0
            .get_arguments()
            .unwrap_or_default()
            .iter()
            .map(|p| p.get_type().map(|t| t.get_display_name()).unwrap_or_default())
            .collect()
    }

    fn definition(&self) -> Option<Self> {
        self.0.get_definition().map(ClangCursor)
    }
}
