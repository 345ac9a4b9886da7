use serde::{Deserialize, Serialize};

/// A contiguous line range taken from one source file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodeChunk {
    /// Source file path
    pub file_path: String,

    /// Start line (1-indexed)
    pub start_line: usize,

    /// End line (1-indexed, inclusive)
    pub end_line: usize,

    /// Source lines of the range joined with `\n`
    pub text: String,
}

impl CodeChunk {
    /// Create a new code chunk
    #[must_use]
    pub const fn new(file_path: String, start_line: usize, end_line: usize, text: String) -> Self {
        Self {
            file_path,
            start_line,
            end_line,
            text,
        }
    }

    /// Get the number of lines in this chunk
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    /// Check if chunk contains a specific line
    #[must_use]
    pub const fn contains_line(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }
}
