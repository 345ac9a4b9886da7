use crate::error::{Result, SearchError};
use codescout_vector_store::{cosine_similarity, Index};
use serde::{Deserialize, Serialize};

/// One ranked hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// 1-based position after sorting
    pub rank: usize,
    /// Cosine similarity to the query
    pub score: f32,
    pub file_path: String,
    pub start_line: usize,
    pub end_line: usize,
    pub text: String,
}

/// Read-only query engine over a loaded [`Index`]
#[derive(Debug, Clone, Copy)]
pub struct SearchEngine<'a> {
    index: &'a Index,
}

impl<'a> SearchEngine<'a> {
    #[must_use]
    pub const fn new(index: &'a Index) -> Self {
        Self { index }
    }

    /// Similarity of `query` to every chunk, in chunk order.
    #[must_use]
    pub fn scores(&self, query: &str) -> Vec<f32> {
        let q = self.index.model().transform(query);
        let q = q.view();
        self.index
            .matrix()
            .rows()
            .map(|row| cosine_similarity(&q, &row))
            .collect()
    }

    /// The `top_k` chunks most similar to `query`.
    ///
    /// Ties keep the original chunk order, so a blank query returns the first
    /// `top_k` chunks with score `0.0`.
    pub fn search(&self, query: &str, top_k: usize) -> Result<Vec<QueryResult>> {
        if top_k == 0 {
            return Err(SearchError::InvalidTopK(top_k));
        }
        if self.index.is_empty() {
            return Ok(Vec::new());
        }

        let scores = self.scores(query);
        let mut order: Vec<usize> = (0..scores.len()).collect();
        // Stable: equal scores stay in ascending chunk index.
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
        order.truncate(top_k);

        let chunks = self.index.chunks();
        let results: Vec<QueryResult> = order
            .into_iter()
            .enumerate()
            .map(|(pos, idx)| {
                let chunk = &chunks[idx];
                QueryResult {
                    rank: pos + 1,
                    score: scores[idx],
                    file_path: chunk.file_path.clone(),
                    start_line: chunk.start_line,
                    end_line: chunk.end_line,
                    text: chunk.text.clone(),
                }
            })
            .collect();

        log::debug!(
            "query of {} chars -> {} results (best {:.3})",
            query.len(),
            results.len(),
            results.first().map_or(0.0, |r| r.score)
        );
        Ok(results)
    }
}
