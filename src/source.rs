//! Loading the Rust sources that define request and response payload types.
//!
//! [`SourceSet::load`] walks a project directory, parses every `.rs` file with `syn`
//! and keeps the syntax trees for the [`TypeResolver`](crate::type_resolver::TypeResolver).
//! Files that cannot be read or parsed are recorded as warnings and skipped, so a single
//! broken file never prevents a document from being generated.

use crate::error::{Error, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A successfully parsed Rust file.
#[derive(Debug)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub syntax_tree: syn::File,
}

/// All type sources of a project.
#[derive(Debug, Default)]
pub struct SourceSet {
    pub files: Vec<ParsedFile>,
    /// Problems found while loading; each one skipped a file or directory
    pub warnings: Vec<String>,
}

impl ParsedFile {
    /// Parses Rust source text held in memory; `path` is only used for messages.
    pub fn from_source(path: impl Into<PathBuf>, source: &str) -> Result<Self> {
        let path = path.into();
        let syntax_tree = syn::parse_file(source).map_err(|e| Error::ParseError {
            file: path.clone(),
            message: e.to_string(),
        })?;
        Ok(Self { path, syntax_tree })
    }

    /// Reads and parses a single file.
    pub fn read(path: &Path) -> Result<Self> {
        debug!("Parsing file: {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_source(path, &content)
    }
}

impl SourceSet {
    /// Loads every `.rs` file below `root`, skipping `target` and hidden directories.
    pub fn load(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(Error::InvalidArgument(format!(
                "source path is not a directory: {}",
                root.display()
            )));
        }

        let mut set = SourceSet::default();
        let walker = WalkDir::new(root).into_iter().filter_entry(|e| {
            if e.path() == root {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !name.starts_with('.') && name != "target"
        });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let message = format!("Failed to access path: {}", e);
                    warn!("{}", message);
                    set.warnings.push(message);
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().map_or(true, |ext| ext != "rs") {
                continue;
            }

            match ParsedFile::read(path) {
                Ok(parsed) => set.files.push(parsed),
                Err(e) => {
                    let message = format!("Skipping {}: {}", path.display(), e);
                    warn!("{}", message);
                    set.warnings.push(message);
                }
            }
        }

        debug!(
            "Loaded {} source files ({} warnings) from {}",
            set.files.len(),
            set.warnings.len(),
            root.display()
        );
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, relative: &str, content: &str) {
        let path = dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_from_source() {
        let parsed = ParsedFile::from_source("types.rs", "pub struct User { pub id: u32 }").unwrap();
        assert_eq!(parsed.path, PathBuf::from("types.rs"));
        assert_eq!(parsed.syntax_tree.items.len(), 1);
    }

    #[test]
    fn test_from_source_invalid_syntax() {
        let result = ParsedFile::from_source("broken.rs", "pub struct {");
        match result {
            Err(Error::ParseError { file, .. }) => assert_eq!(file, PathBuf::from("broken.rs")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_directory() {
        let dir = TempDir::new().unwrap();
        write(&dir, "src/lib.rs", "pub struct A;");
        write(&dir, "src/models/user.rs", "pub struct User { pub id: u32 }");
        write(&dir, "README.md", "# readme");
        write(&dir, "target/debug/build.rs", "pub struct Ignored;");
        write(&dir, ".hidden/secret.rs", "pub struct Hidden;");

        let set = SourceSet::load(dir.path()).unwrap();

        assert_eq!(set.files.len(), 2);
        assert!(set.warnings.is_empty());
        assert!(set
            .files
            .iter()
            .all(|f| !f.path.to_string_lossy().contains("target")));
    }

    #[test]
    fn test_load_keeps_going_after_parse_failure() {
        let dir = TempDir::new().unwrap();
        write(&dir, "good.rs", "pub struct Good { pub ok: bool }");
        write(&dir, "bad.rs", "pub struct Bad {");

        let set = SourceSet::load(dir.path()).unwrap();

        assert_eq!(set.files.len(), 1);
        assert_eq!(set.warnings.len(), 1);
        assert!(set.warnings[0].contains("bad.rs"));
    }

    #[test]
    fn test_load_rejects_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(SourceSet::load(&missing).is_err());
    }
}
