//! Helpers to parse CLI arguments in the accompanying
//! binary.
//!
//! APIs here shouldn't be considered stable / used as a
//! library.

use std::path::Path;

pub use clap::{App, Arg};
pub use inflector::Inflector;

#[macro_export]
macro_rules! args_parser {
    ($name:expr) => {{
        $crate::cli::App::new($name)
            .version(clap::crate_version!())
            .author(clap::crate_authors!())
    }};
}

#[macro_export]
macro_rules! arg {
    ($name:expr) => {{
        use $crate::cli::Inflector;
        $crate::cli::Arg::with_name($name).value_name(&$name.to_screaming_snake_case())
    }};
}

#[macro_export]
macro_rules! opt {
    ($name:expr) => {{
        use $crate::cli::Inflector;
        $crate::cli::Arg::with_name($name)
            .long(&$name.to_kebab_case())
            .value_name(&$name.to_screaming_snake_case())
    }};
}

/// Triage of the positional path argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Directory,
    Missing,
}

pub fn path_kind(path: &Path) -> PathKind {
    if path.is_dir() {
        PathKind::Directory
    } else if path.is_file() {
        PathKind::File
    } else {
        PathKind::Missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triages_paths() {
        let dir = std::env::temp_dir();
        assert_eq!(path_kind(&dir), PathKind::Directory);

        let file = dir.join(format!("thermal-trend-triage-{}", std::process::id()));
        std::fs::write(&file, b"x").unwrap();
        assert_eq!(path_kind(&file), PathKind::File);
        std::fs::remove_file(&file).unwrap();

        assert_eq!(path_kind(Path::new("/no/such/path")), PathKind::Missing);
    }
}
