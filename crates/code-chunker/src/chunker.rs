use crate::config::ChunkerConfig;
use crate::error::{ChunkerError, Result};
use crate::types::CodeChunk;
use std::path::Path;

/// Main chunker interface for processing code
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    /// Create a new chunker, rejecting configurations that cannot make progress
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        config.validate().map_err(ChunkerError::invalid_config)?;
        Ok(Self { config })
    }

    #[must_use]
    pub const fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Chunk text that belongs to `file_path`.
    ///
    /// An empty input produces no chunks. Every line is covered by at least one
    /// chunk and the last chunk always ends on the final line.
    #[must_use]
    pub fn chunk_str(&self, content: &str, file_path: &str) -> Vec<CodeChunk> {
        let lines = split_lines(content);
        let n = lines.len();
        let mut chunks = Vec::with_capacity(n / self.config.stride() + 1);
        let mut start = 0;

        while start < n {
            let end = (start + self.config.max_lines).min(n);
            chunks.push(CodeChunk::new(
                file_path.to_string(),
                start + 1,
                end,
                lines[start..end].join("\n"),
            ));

            if end == n {
                break;
            }
            start = end - self.config.overlap;
        }

        log::trace!("{file_path}: {n} lines -> {} chunks", chunks.len());
        chunks
    }

    /// Read a UTF-8 file from disk and chunk it under `file_path`
    pub fn chunk_file(&self, path: impl AsRef<Path>, file_path: &str) -> Result<Vec<CodeChunk>> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(self.chunk_str(&content, file_path))
    }
}

/// Split `content` on every line boundary: `\n`, `\r\n`, a lone `\r`, vertical
/// tab, form feed, the ASCII file/group/record separators, NEL, and U+2028/U+2029.
///
/// Terminators are dropped and a trailing terminator does not open an extra
/// empty line.
#[must_use]
pub fn split_lines(content: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut iter = content.char_indices().peekable();
    while let Some((pos, ch)) = iter.next() {
        if !is_line_boundary(ch) {
            continue;
        }
        lines.push(&content[start..pos]);
        start = pos + ch.len_utf8();
        if ch == '\r' {
            if let Some((next_pos, '\n')) = iter.peek().copied() {
                iter.next();
                start = next_pos + 1;
            }
        }
    }
    if start < content.len() {
        lines.push(&content[start..]);
    }
    lines
}

const LINE_BOUNDARIES: [char; 10] = [
    '\n', '\r', '\u{0b}', '\u{0c}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{85}', '\u{2028}', '\u{2029}',
];

fn is_line_boundary(ch: char) -> bool {
    LINE_BOUNDARIES.contains(&ch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn numbered_lines(n: usize) -> String {
        (1..=n)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn ranges(chunks: &[CodeChunk]) -> Vec<(usize, usize)> {
        chunks.iter().map(|c| (c.start_line, c.end_line)).collect()
    }

    #[test]
    fn ten_lines_window_four_overlap_one() {
        let chunker = Chunker::new(ChunkerConfig {
            max_lines: 4,
            overlap: 1,
        })
        .unwrap();

        let chunks = chunker.chunk_str(&numbered_lines(10), "app.js");

        assert_eq!(ranges(&chunks), vec![(1, 4), (4, 7), (7, 10)]);
        assert_eq!(chunks[2].text, "line 7\nline 8\nline 9\nline 10");
        assert!(chunks.iter().all(|c| c.file_path == "app.js"));
    }

    #[test]
    fn empty_file_has_no_chunks() {
        let chunker = Chunker::new(ChunkerConfig::default()).unwrap();
        assert!(chunker.chunk_str("", "empty.ts").is_empty());
    }

    #[test]
    fn short_file_is_single_chunk() {
        let chunker = Chunker::new(ChunkerConfig::default()).unwrap();
        let chunks = chunker.chunk_str("a\nb\nc\n", "short.css");

        assert_eq!(ranges(&chunks), vec![(1, 3)]);
        assert_eq!(chunks[0].text, "a\nb\nc");
    }

    #[test]
    fn exact_multiple_of_window_without_overlap() {
        let chunker = Chunker::new(ChunkerConfig {
            max_lines: 5,
            overlap: 0,
        })
        .unwrap();

        let chunks = chunker.chunk_str(&numbered_lines(10), "a.hbs");
        assert_eq!(ranges(&chunks), vec![(1, 5), (6, 10)]);
    }

    #[test]
    fn crlf_line_endings_are_stripped() {
        let chunker = Chunker::new(ChunkerConfig {
            max_lines: 2,
            overlap: 0,
        })
        .unwrap();

        let chunks = chunker.chunk_str("one\r\ntwo\r\nthree", "win.html");
        assert_eq!(chunks[0].text, "one\ntwo");
        assert_eq!(chunks[1].text, "three");
    }

    #[test]
    fn classic_mac_line_endings_split_into_lines() {
        let chunker = Chunker::new(ChunkerConfig {
            max_lines: 2,
            overlap: 0,
        })
        .unwrap();

        let chunks = chunker.chunk_str("one\rtwo\rthree\r", "mac.css");
        assert_eq!(ranges(&chunks), vec![(1, 2), (3, 3)]);
        assert_eq!(chunks[0].text, "one\ntwo");
        assert_eq!(chunks[1].text, "three");
    }

    #[test]
    fn split_lines_handles_every_boundary() {
        assert_eq!(split_lines(""), Vec::<&str>::new());
        assert_eq!(split_lines("a\n"), vec!["a"]);
        assert_eq!(split_lines("a\n\nb"), vec!["a", "", "b"]);
        assert_eq!(split_lines("a\r\nb\rc"), vec!["a", "b", "c"]);
        assert_eq!(
            split_lines("a\u{0b}b\u{0c}c\u{1c}d\u{85}e\u{2028}f\u{2029}g"),
            vec!["a", "b", "c", "d", "e", "f", "g"]
        );
        assert_eq!(split_lines("\r\r\n"), vec!["", ""]);
    }

    #[test]
    fn invalid_overlap_is_rejected() {
        let err = Chunker::new(ChunkerConfig {
            max_lines: 3,
            overlap: 3,
        })
        .unwrap_err();
        assert!(matches!(err, ChunkerError::InvalidConfig(_)));
        assert!(err.to_string().contains("overlap"));
    }

    #[test]
    fn chunk_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.js");
        std::fs::write(&path, numbered_lines(3)).unwrap();

        let chunker = Chunker::new(ChunkerConfig::default()).unwrap();
        let chunks = chunker.chunk_file(&path, "main.js").unwrap();

        assert_eq!(ranges(&chunks), vec![(1, 3)]);
    }
}
