use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Statistics about indexing operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of files processed
    pub files: usize,

    /// Number of chunks created
    pub chunks: usize,

    /// Total lines of code
    pub total_lines: usize,

    /// Time taken in milliseconds
    pub time_ms: u64,

    /// Files per extension
    pub extensions: BTreeMap<String, usize>,

    /// Size of the fitted n-gram vocabulary
    pub vocabulary_size: usize,

    /// Files skipped with the reason
    pub errors: Vec<String>,
}

impl IndexStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, extension: &str, lines: usize) {
        self.files += 1;
        self.total_lines += lines;
        *self.extensions.entry(extension.to_string()).or_insert(0) += 1;
    }

    pub fn add_chunks(&mut self, count: usize) {
        self.chunks += count;
    }

    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_per_extension() {
        let mut stats = IndexStats::new();
        stats.add_file("js", 10);
        stats.add_file("js", 5);
        stats.add_file("hbs", 2);
        stats.add_chunks(4);

        assert_eq!(stats.files, 3);
        assert_eq!(stats.total_lines, 17);
        assert_eq!(stats.extensions.get("js"), Some(&2));
        assert_eq!(stats.chunks, 4);
    }
}
