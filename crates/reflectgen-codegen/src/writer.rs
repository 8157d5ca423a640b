//! Writer (C7, spec §4.7): truncate-and-overwrite both output files.
//! No temp-file/rename dance — last-writer-wins, per spec.

use std::path::Path;

use reflectgen_model::ReflectError;
use tracing::instrument;

#[instrument(skip(header_text, source_text))]
pub fn write_outputs(
    out_header: &Path,
    out_source: &Path,
    header_text: &str,
    source_text: &str,
) -> Result<(), ReflectError> {
    // The source blob consumes its own companion header (spec §4.6).
    let full_source = format!("#include \"{}\"\n{}", out_header.display(), source_text);

    std::fs::write(out_header, header_text).map_err(|source| ReflectError::Io {
        path: out_header.display().to_string(),
        source,
    })?;
    std::fs::write(out_source, full_source).map_err(|source| ReflectError::Io {
        path: out_source.display().to_string(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_both_files_with_header_include_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let out_header = dir.path().join("out.h");
        let out_source = dir.path().join("out.cpp");

        write_outputs(&out_header, &out_source, "HEADER_BODY", "SOURCE_BODY").unwrap();

        let header = std::fs::read_to_string(&out_header).unwrap();
        let source = std::fs::read_to_string(&out_source).unwrap();
        assert_eq!(header, "HEADER_BODY");
        assert!(source.starts_with(&format!("#include \"{}\"", out_header.display())));
        assert!(source.contains("SOURCE_BODY"));
    }

    #[test]
    fn overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let out_header = dir.path().join("out.h");
        let out_source = dir.path().join("out.cpp");

        write_outputs(&out_header, &out_source, "FIRST", "FIRST").unwrap();
        write_outputs(&out_header, &out_source, "SECOND", "SECOND").unwrap();

        let header = std::fs::read_to_string(&out_header).unwrap();
        assert_eq!(header, "SECOND");
    }
}
