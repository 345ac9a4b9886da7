use codescout_indexer::IndexStats;
use codescout_search::QueryResult;
use std::fmt::Write as _;
use std::path::Path;

pub const PREVIEW_LINES: usize = 30;
const RULE_WIDTH: usize = 80;

pub fn render_index_summary(stats: &IndexStats, index_path: &Path) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Indexed {} files ({} lines) into {} chunks in {} ms",
        stats.files, stats.total_lines, stats.chunks, stats.time_ms
    );
    let _ = writeln!(out, "Vocabulary: {} terms", stats.vocabulary_size);
    if !stats.extensions.is_empty() {
        let per_ext: Vec<String> = stats
            .extensions
            .iter()
            .map(|(ext, count)| format!("{ext}: {count}"))
            .collect();
        let _ = writeln!(out, "Extensions: {}", per_ext.join(", "));
    }
    if !stats.errors.is_empty() {
        let _ = writeln!(out, "Skipped {} files:", stats.errors.len());
        for error in &stats.errors {
            let _ = writeln!(out, "  - {error}");
        }
    }
    let _ = write!(out, "Index written to {}", index_path.display());
    out
}

/// One block per hit: header, location, then at most [`PREVIEW_LINES`] lines of code.
pub fn render_results(results: &[QueryResult]) -> String {
    if results.is_empty() {
        return "No results.".to_string();
    }

    let mut out = String::new();
    for hit in results {
        let _ = writeln!(out, "\n{}", "=".repeat(RULE_WIDTH));
        let _ = writeln!(out, "Hit #{}  Score: {:.3}", hit.rank, hit.score);
        let _ = writeln!(
            out,
            "File: {} (lines {}–{})",
            hit.file_path, hit.start_line, hit.end_line
        );
        let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
        out.push_str(&preview(&hit.text, PREVIEW_LINES));
    }
    out.trim_end().to_string()
}

pub fn render_ticket_header(item_id: u64, text: &str) -> String {
    format!("=== Ticket {item_id} ===\n{text}\n\n=== Repository matches ===")
}

fn preview(text: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let mut out = lines
        .iter()
        .take(max_lines)
        .fold(String::new(), |mut acc, line| {
            acc.push_str(line);
            acc.push('\n');
            acc
        });
    if lines.len() > max_lines {
        out.push_str("... (truncated)\n");
    }
    out
}
