//! The front-end driver (C1, spec §4.1): invokes libclang on the input
//! header with a fixed compilation profile and hands the resulting root
//! cursor to a callback.
//!
//! The callback shape sidesteps the self-referential-struct problem of
//! storing a `clang::Index`/`TranslationUnit` pair across a long-lived
//! value: per spec §5 the whole pipeline is single-pass and synchronous,
//! so there is no need to keep the translation unit alive past one
//! invocation.

use std::path::{Path, PathBuf};

use clang::{Clang, Index, TranslationUnit, Unsaved};
use reflectgen_model::ReflectError;
use tracing::{debug, instrument};

use crate::cursor::ClangCursor;

const DIALECT_ARGS: &[&str] = &[
    "-x",
    "c++",
    "-std=c++20",
    "-Wno-pragma-once-outside-header",
    "-DDURING_BUILD_TOOL_PROCESS=1",
];

/// Filters out every empty include-path entry (spec §4.1 / §9 — the
/// original draft only dropped the first one; we drop all of them).
pub fn build_include_args(include_paths: &[String]) -> Vec<String> {
    include_paths
        .iter()
        .filter(|p| !p.is_empty())
        .map(|p| format!("-I{p}"))
        .collect()
}

pub fn canonicalize(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Parses `input_header` and invokes `with_root` with a cursor over the
/// translation unit's root. Non-fatal diagnostics are logged and ignored;
/// diagnostics that prevent AST construction become `ReflectError::Frontend`.
#[instrument(skip(with_root))]
pub fn parse_header<R>(
    input_header: &Path,
    include_paths: &[String],
    with_root: impl FnOnce(ClangCursor<'_>) -> R,
) -> Result<R, ReflectError> {
    let path_str = input_header.display().to_string();
    let source = std::fs::read_to_string(input_header).map_err(|source| ReflectError::Io {
        path: path_str.clone(),
        source,
    })?;

    let clang = Clang::new().map_err(|e| ReflectError::Frontend {
        path: path_str.clone(),
        diagnostics: e,
    })?;
    let index = Index::new(&clang, false, false);

    let mut args: Vec<String> = DIALECT_ARGS.iter().map(|s| s.to_string()).collect();
    args.extend(build_include_args(include_paths));

    let unsaved = Unsaved::new(input_header, &source);
    let tu: TranslationUnit<'_> = index
        .parser(input_header)
        .arguments(&args)
        .unsaved(&[unsaved])
        .skip_function_bodies(true)
        .parse()
        .map_err(|e| ReflectError::Frontend {
            path: path_str.clone(),
            diagnostics: e.to_string(),
        })?;

    for diagnostic in tu.get_diagnostics() {
        debug!(%diagnostic, "non-fatal front-end diagnostic");
    }

    let root = ClangCursor::new(tu.get_entity());
    Ok(with_root(root))
}
