//! The semantic model (spec §3/§4.3): `ClassModel`, `FieldModel`,
//! `MethodModel`, with derived attributes computed once at construction
//! (the model is short-lived and per-invocation, so eager computation is
//! simpler than lazy memoization and costs nothing — see spec §9).

use crate::cursor::{Access, Cursor, CursorKind};
use crate::error::{ReflectError, SourceLocation};
use crate::hash::fnv1a_64;
use crate::metadata::{extract_metadata, Metadata};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Struct,
    Union,
}

impl ClassKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Struct => "struct",
            ClassKind::Union => "union",
        }
    }
}

/// Splits a canonical spelling at the last `::`, returning (namespace, leaf).
/// A name with no `::` has an empty namespace.
pub fn extract_namespace(spelling: &str) -> (String, String) {
    match spelling.rfind("::") {
        Some(idx) => (spelling[..idx].to_string(), spelling[idx + 2..].to_string()),
        None => (String::new(), spelling.to_string()),
    }
}

/// FQN split on `::`, each part's first letter upper-cased, concatenated.
pub fn camel_case_name(fully_qualified_name: &str) -> String {
    fully_qualified_name
        .split("::")
        .map(capitalize_first)
        .collect()
}

fn capitalize_first(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[derive(Debug)]
pub struct FieldModel<C: Cursor> {
    pub cursor: C,
    pub display_name: String,
    pub access: Access,
    pub canonical_type_spelling: String,
    pub metadata: Option<Metadata>,
    pub metaclass_name: String,
    pub metastorage_name: String,
    pub location: SourceLocation,
}

impl<C: Cursor> FieldModel<C> {
    fn new(cursor: C, parent_camel_case_name: &str) -> Result<Self, ReflectError> {
        let display_name = cursor.spelling();
        let location = cursor.location();
        let metadata = extract_metadata(cursor.raw_comment().as_deref(), &location)?;
        let metaclass_name =
            format!("{parent_camel_case_name}_of_{display_name}MetaField__internal__");
        let metastorage_name = format!("{metaclass_name}__MetaStorage");
        Ok(Self {
            access: cursor.access(),
            canonical_type_spelling: cursor.canonical_type_spelling(),
            metadata,
            metaclass_name,
            metastorage_name,
            location,
            display_name,
            cursor,
        })
    }
}

#[derive(Debug)]
pub struct MethodModel<C: Cursor> {
    pub cursor: C,
    pub display_name: String,
    pub access: Access,
    pub metadata: Option<Metadata>,
    pub metaclass_name: String,
    pub metastorage_name: String,
    pub return_type: String,
    pub param_typenames: Vec<String>,
    pub location: SourceLocation,
}

impl<C: Cursor> MethodModel<C> {
    fn new(cursor: C, parent_camel_case_name: &str) -> Result<Self, ReflectError> {
        let display_name = cursor.spelling();
        let location = cursor.location();
        let metadata = extract_metadata(cursor.raw_comment().as_deref(), &location)?;
        let metaclass_name =
            format!("{parent_camel_case_name}_of_{display_name}MetaMethod__internal__");
        let metastorage_name = format!("{metaclass_name}__MetaStorage");
        let return_type = cursor.result_type_spelling();
        let param_typenames = cursor.param_type_spellings();
        Ok(Self {
            access: cursor.access(),
            metadata,
            metaclass_name,
            metastorage_name,
            return_type,
            param_typenames,
            location,
            display_name,
            cursor,
        })
    }
}

#[derive(Debug)]
pub struct ClassModel<C: Cursor> {
    pub decl_cursor: C,
    pub fully_qualified_name: String,
    pub namespace: String,
    pub leaf_name: String,
    pub display_name: String,
    pub kind: ClassKind,
    pub camel_case_name: String,
    pub metaclass_name: String,
    pub metastorage_name: String,
    pub type_hash: u64,
    pub base_classes: Vec<C>,
    pub base_classes_flatten: Vec<C>,
    pub derived_from_object: bool,
    pub metadata: Option<Metadata>,
    pub fields: Vec<FieldModel<C>>,
    pub methods: Vec<MethodModel<C>>,
    pub public_fields: Vec<usize>,
    pub public_methods: Vec<usize>,
}

const OBJECT_BASE: &str = "avalanche::Object";

impl<C: Cursor> ClassModel<C> {
    pub fn build(decl_cursor: C) -> Result<Self, ReflectError> {
        let fully_qualified_name = decl_cursor.canonical_type_spelling();
        let (namespace, leaf_name) = extract_namespace(&fully_qualified_name);
        let display_name = decl_cursor.spelling();
        let kind = match decl_cursor.kind() {
            CursorKind::StructDecl => ClassKind::Struct,
            CursorKind::UnionDecl => ClassKind::Union,
            _ => ClassKind::Class,
        };
        let camel_case_name = camel_case_name(&fully_qualified_name);
        let metaclass_name = format!("{camel_case_name}MetaClass__internal__");
        let metastorage_name = format!("{metaclass_name}__MetaStorage");
        let type_hash = fnv1a_64(&fully_qualified_name);

        let base_classes = direct_base_specifiers(&decl_cursor);
        let base_classes_flatten = flatten_base_classes(&decl_cursor);
        let derived_from_object = base_classes_flatten
            .iter()
            .any(|b| b.canonical_type_spelling() == OBJECT_BASE);

        let location = decl_cursor.location();
        let metadata = extract_metadata(decl_cursor.raw_comment().as_deref(), &location)?;

        let mut fields = Vec::new();
        let mut methods = Vec::new();
        for child in decl_cursor.children() {
            match child.kind() {
                CursorKind::FieldDecl => fields.push(FieldModel::new(child, &camel_case_name)?),
                CursorKind::MethodDecl => methods.push(MethodModel::new(child, &camel_case_name)?),
                _ => {}
            }
        }

        let public_fields = select_public_fields(&fields)?;
        let public_methods = select_public_methods(&methods)?;

        Ok(Self {
            decl_cursor,
            fully_qualified_name,
            namespace,
            leaf_name,
            display_name,
            kind,
            camel_case_name,
            metaclass_name,
            metastorage_name,
            type_hash,
            base_classes,
            base_classes_flatten,
            derived_from_object,
            metadata,
            fields,
            methods,
            public_fields,
            public_methods,
        })
    }

    /// A class is registered iff it carries metadata or derives from
    /// `avalanche::Object` (spec invariant 5).
    pub fn is_registered(&self) -> bool {
        self.metadata.is_some() || self.derived_from_object
    }
}

/// Any member carrying metadata must be `public`; otherwise it's a fatal
/// access-specifier violation (spec invariant 4 / §7).
fn select_public_fields<C: Cursor>(
    fields: &[FieldModel<C>],
) -> Result<Vec<usize>, ReflectError> {
    select_public_members(fields, "field", |f| (f.access, &f.metadata, &f.display_name, &f.location))
}

fn select_public_methods<C: Cursor>(
    methods: &[MethodModel<C>],
) -> Result<Vec<usize>, ReflectError> {
    select_public_members(methods, "method", |m| (m.access, &m.metadata, &m.display_name, &m.location))
}

fn select_public_members<T>(
    members: &[T],
    kind: &str,
    view: impl Fn(&T) -> (Access, &Option<Metadata>, &String, &SourceLocation),
) -> Result<Vec<usize>, ReflectError> {
    let mut indices = Vec::new();
    for (i, member) in members.iter().enumerate() {
        let (access, metadata, name, location) = view(member);
        if metadata.is_none() {
            continue;
        }
        if access != Access::Public {
            return Err(ReflectError::AccessSpecifier {
                location: location.clone(),
                kind: kind.to_string(),
                name: name.clone(),
                found: access.as_str().to_string(),
            });
        }
        indices.push(i);
    }
    Ok(indices)
}

fn direct_base_specifiers<C: Cursor>(cursor: &C) -> Vec<C> {
    cursor
        .children()
        .into_iter()
        .filter(|c| c.kind() == CursorKind::BaseSpecifier)
        .collect()
}

/// Transitive closure of base specifiers (spec §3: a *set* of
/// transitively-reachable bases — the original `process.py` builds it with
/// `set()`): direct bases, plus recursively the bases found among a base's
/// own children, or — when the base is a template specialization — among
/// the bases of the resolved template definition. Deduplicated by
/// canonical spelling so diamond inheritance doesn't list a shared base
/// twice.
fn flatten_base_classes<C: Cursor>(cursor: &C) -> Vec<C> {
    let mut result = Vec::new();
    let mut seen = std::collections::HashSet::new();
    collect_base_specifiers(cursor, &mut result, &mut seen);
    result
}

fn collect_base_specifiers<C: Cursor>(
    cursor: &C,
    out: &mut Vec<C>,
    seen: &mut std::collections::HashSet<String>,
) {
    for child in cursor.children() {
        match child.kind() {
            CursorKind::BaseSpecifier => {
                push_unique_base(child.clone(), out, seen);
                collect_base_specifiers(&child, out, seen);
            }
            CursorKind::TemplateRef => {
                if let Some(definition) = child.definition() {
                    for tchild in definition.children() {
                        if tchild.kind() == CursorKind::BaseSpecifier {
                            push_unique_base(tchild.clone(), out, seen);
                            collect_base_specifiers(&tchild, out, seen);
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

fn push_unique_base<C: Cursor>(base: C, out: &mut Vec<C>, seen: &mut std::collections::HashSet<String>) {
    if seen.insert(base.canonical_type_spelling()) {
        out.push(base);
    }
}
