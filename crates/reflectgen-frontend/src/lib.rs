//! Front-end driver (C1, spec §4.1): drives libclang over one input header
//! and exposes its AST as `reflectgen_model::Cursor` implementors.

pub mod cursor;
pub mod driver;

pub use cursor::ClangCursor;
pub use driver::{build_include_args, canonicalize, parse_header};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_include_args_drops_all_empty_entries() {
        let paths = vec![
            "".to_string(),
            "/usr/include".to_string(),
            "".to_string(),
            "/opt/include".to_string(),
        ];
        assert_eq!(
            build_include_args(&paths),
            vec!["-I/usr/include".to_string(), "-I/opt/include".to_string()]
        );
    }

    #[test]
    fn build_include_args_on_all_empty_is_empty() {
        let paths = vec!["".to_string(), "".to_string()];
        assert!(build_include_args(&paths).is_empty());
    }
}
