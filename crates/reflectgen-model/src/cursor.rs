//! The `Cursor` seam (spec §3): an opaque handle into a host-language
//! semantic AST. `reflectgen-frontend` provides the concrete clang-backed
//! implementation; this crate only needs the shape of it to build
//! `ClassModel`/`FieldModel`/`MethodModel`, so the model stays testable
//! without linking libclang.

use crate::error::SourceLocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorKind {
    ClassDecl,
    StructDecl,
    UnionDecl,
    FieldDecl,
    MethodDecl,
    BaseSpecifier,
    TemplateRef,
    Parameter,
    TranslationUnit,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Invalid,
    Public,
    Protected,
    Private,
    None,
}

impl Access {
    pub fn as_str(&self) -> &'static str {
        match self {
            Access::Invalid => "invalid",
            Access::Public => "public",
            Access::Protected => "protected",
            Access::Private => "private",
            Access::None => "none",
        }
    }
}

/// A declaration handle from the host-language front end.
///
/// Implementors are expected to be cheap to `Clone` (a thin handle into an
/// arena or translation-unit-owned tree, mirroring `clang::Entity`).
pub trait Cursor: Clone {
    fn kind(&self) -> CursorKind;
    fn spelling(&self) -> String;
    /// Canonical, namespace-qualified type spelling (e.g. `ns::Inner::Foo`).
    fn canonical_type_spelling(&self) -> String;
    fn raw_comment(&self) -> Option<String>;
    fn access(&self) -> Access;
    fn children(&self) -> Vec<Self>
    where
        Self: Sized;
    fn is_definition(&self) -> bool;
    fn location(&self) -> SourceLocation;
    fn is_static_method(&self) -> bool;
    fn result_type_spelling(&self) -> String;
    fn param_type_spellings(&self) -> Vec<String>;
    /// For a `TemplateRef` cursor, the cursor of the referenced template's
    /// definition, if resolvable.
    fn definition(&self) -> Option<Self>
    where
        Self: Sized;
}
