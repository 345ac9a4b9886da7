use crate::error::{IndexerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Which directories to prune and which file extensions to keep
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Directory names skipped anywhere below the root
    pub ignore_dirs: Vec<String>,

    /// Allowed file extensions, without the leading dot (case-insensitive)
    pub extensions: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            ignore_dirs: DEFAULT_IGNORED_DIRS.iter().map(ToString::to_string).collect(),
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl ScanOptions {
    fn normalized(mut self) -> Self {
        for ext in &mut self.extensions {
            *ext = ext.trim_start_matches('.').to_lowercase();
        }
        self
    }
}

/// Scanner for finding source files in a project
pub struct FileScanner {
    root: PathBuf,
    options: ScanOptions,
}

impl FileScanner {
    /// Fails when `root` does not exist or is not a directory.
    pub fn new(root: impl AsRef<Path>, options: ScanOptions) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(IndexerError::InvalidPath(format!(
                "{} does not exist or is not a directory",
                root.display()
            )));
        }
        Ok(Self {
            root: root.to_path_buf(),
            options: options.normalized(),
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lazily walk the tree in filesystem order.
    ///
    /// Ignored directories are pruned without being entered. Unreadable entries are
    /// logged and skipped.
    pub fn scan(&self) -> impl Iterator<Item = PathBuf> + '_ {
        WalkDir::new(&self.root)
            .into_iter()
            .filter_entry(move |entry| !self.is_ignored_scope(entry))
            .filter_map(|result| match result {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Failed to read entry: {e}");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(move |entry| self.is_source_file(entry.path()))
            .map(DirEntry::into_path)
    }

    /// Path of `path` relative to the root, `/`-separated
    #[must_use]
    pub fn relative_path(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_lowercase();
                self.options.extensions.iter().any(|allowed| allowed == &ext)
            })
    }

    fn is_ignored_scope(&self, entry: &DirEntry) -> bool {
        // The root itself is never pruned, whatever its name.
        if entry.depth() == 0 {
            return false;
        }
        entry
            .file_name()
            .to_str()
            .is_some_and(|name| self.options.ignore_dirs.iter().any(|ignored| ignored == name))
            && entry.file_type().is_dir()
    }
}

const DEFAULT_IGNORED_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "dist",
    "build",
    "__pycache__",
    "vendor",
];

/// Ember / front-end sources
const DEFAULT_EXTENSIONS: &[&str] = &["js", "ts", "hbs", "css", "scss", "html"];

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn scan_relative(root: &Path, options: ScanOptions) -> Vec<String> {
        let scanner = FileScanner::new(root, options).unwrap();
        let mut files: Vec<String> = scanner.scan().map(|p| scanner.relative_path(&p)).collect();
        files.sort();
        files
    }

    #[test]
    fn skips_ignored_directories() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("node_modules/lib")).unwrap();
        fs::create_dir_all(root.join("app/dist")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join("node_modules/lib/index.js"), b"x").unwrap();
        fs::write(root.join("app/dist/bundle.js"), b"x").unwrap();
        fs::write(root.join(".git/config.js"), b"x").unwrap();
        fs::write(root.join("app/app.js"), b"x").unwrap();

        assert_eq!(scan_relative(root, ScanOptions::default()), vec!["app/app.js"]);
    }

    #[test]
    fn keeps_only_allowed_extensions() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("a.js"), b"x").unwrap();
        fs::write(root.join("b.HBS"), b"x").unwrap();
        fs::write(root.join("c.rs"), b"x").unwrap();
        fs::write(root.join("README"), b"x").unwrap();

        assert_eq!(
            scan_relative(root, ScanOptions::default()),
            vec!["a.js", "b.HBS"]
        );
    }

    #[test]
    fn custom_options_accept_dotted_extensions() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("target")).unwrap();
        fs::write(root.join("lib.rs"), b"x").unwrap();
        fs::write(root.join("target/gen.rs"), b"x").unwrap();
        fs::write(root.join("app.js"), b"x").unwrap();

        let options = ScanOptions {
            ignore_dirs: vec!["target".to_string()],
            extensions: vec![".rs".to_string()],
        };
        assert_eq!(scan_relative(root, options), vec!["lib.rs"]);
    }

    #[test]
    fn ignored_name_on_a_file_is_not_pruned() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("build.js"), b"x").unwrap();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/build"), b"x").unwrap();

        assert_eq!(scan_relative(root, ScanOptions::default()), vec!["build.js"]);
    }

    #[test]
    fn root_named_like_ignored_dir_is_still_walked() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("build");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("main.ts"), b"x").unwrap();

        assert_eq!(scan_relative(&root, ScanOptions::default()), vec!["main.ts"]);
    }

    #[test]
    fn missing_root_is_rejected() {
        let temp = tempdir().unwrap();
        let result = FileScanner::new(temp.path().join("nope"), ScanOptions::default());
        assert!(matches!(result, Err(IndexerError::InvalidPath(_))));
    }
}
