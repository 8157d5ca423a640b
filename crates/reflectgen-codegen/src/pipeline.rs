//! Orchestrates C1 (front-end) → C2 (walker) → C3 (model) → C6 (emitter) →
//! C7 (writer) for one `binding` invocation (spec §5: single-threaded,
//! synchronous, one invocation per input header).

use std::path::Path;

use reflectgen_frontend::{canonicalize, parse_header};
use reflectgen_model::{ClassModel, ReflectError};
use tracing::{info, instrument};

use crate::emit::{generate_run_id, Emitter};
use crate::walker::select_classes;
use crate::writer::write_outputs;

// `parse_header`'s callback is `for<'a> FnOnce(ClangCursor<'a>) -> R` with
// `R` fixed independent of `'a` — a `ClassModel<ClangCursor<'a>>` (or
// anything borrowing from it) can't be named by a single `R`, so the walk,
// model build, and emission all have to happen *inside* the closure and
// only the owned `(String, String)` blobs cross back out.
#[instrument(skip(include_paths))]
pub fn run_binding(
    input_header: &Path,
    out_header: &Path,
    out_source: &Path,
    include_paths: &[String],
) -> Result<(), ReflectError> {
    let canonical_input = canonicalize(input_header);
    let input_header_str = input_header.display().to_string();
    let run_id = generate_run_id();

    let (header_text, source_text) = parse_header::<Result<(String, String), ReflectError>>(
        input_header,
        include_paths,
        |root| {
            let models = select_classes(&root, &canonical_input)
                .into_iter()
                .map(ClassModel::build)
                .collect::<Result<Vec<_>, ReflectError>>()?;

            let registered: Vec<&ClassModel<_>> = models.iter().filter(|m| m.is_registered()).collect();
            info!(
                selected = models.len(),
                registered = registered.len(),
                "classes processed"
            );

            let mut emitter = Emitter::new(run_id, &input_header_str);
            for model in &registered {
                emitter.emit_class(model);
            }
            Ok(emitter.finish())
        },
    )??;

    write_outputs(out_header, out_source, &header_text, &source_text)
}
