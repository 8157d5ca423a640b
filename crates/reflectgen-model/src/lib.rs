//! Semantic model, structured-metadata parsing, and hashing for the
//! reflection code generator (spec §3, §4.3–§4.5).
//!
//! This crate has no dependency on libclang: `Cursor` is a trait the
//! front-end crate implements, so the model — and its access-specifier and
//! metadata-flattening invariants — can be unit-tested without a C++
//! compiler on hand.

pub mod class_model;
pub mod config;
pub mod cursor;
pub mod error;
pub mod hash;
pub mod metadata;

pub use class_model::{camel_case_name, extract_namespace, ClassKind, ClassModel, FieldModel, MethodModel};
pub use cursor::{Access, Cursor, CursorKind};
pub use error::{ReflectError, ReflectResult, SourceLocation};
pub use metadata::{Metadata, MetadataValue};
