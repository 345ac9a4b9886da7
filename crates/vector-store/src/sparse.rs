use serde::{Deserialize, Serialize};

/// Borrowed sparse vector: parallel column indices (strictly increasing) and values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparseView<'a> {
    pub indices: &'a [usize],
    pub values: &'a [f32],
}

impl SparseView<'_> {
    #[must_use]
    pub fn dot(&self, other: &SparseView<'_>) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0f32;
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    #[must_use]
    pub fn norm(&self) -> f32 {
        self.values.iter().map(|v| v * v).sum::<f32>().sqrt()
    }

    #[must_use]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }
}

/// Cosine similarity of two sparse vectors; `0.0` when either norm is zero.
#[must_use]
pub fn cosine_similarity(a: &SparseView<'_>, b: &SparseView<'_>) -> f32 {
    let norm_a = a.norm();
    let norm_b = b.norm();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    a.dot(b) / (norm_a * norm_b)
}

/// Owned sparse vector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    pub indices: Vec<usize>,
    pub values: Vec<f32>,
}

impl SparseVector {
    /// Build from unsorted `(column, weight)` entries, dropping zeros.
    #[must_use]
    pub fn from_entries(mut entries: Vec<(usize, f32)>) -> Self {
        entries.retain(|(_, w)| *w != 0.0);
        entries.sort_by_key(|(col, _)| *col);
        let (indices, values) = entries.into_iter().unzip();
        Self { indices, values }
    }

    #[must_use]
    pub fn view(&self) -> SparseView<'_> {
        SparseView {
            indices: &self.indices,
            values: &self.values,
        }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.indices.is_empty()
    }

    /// Scale to unit L2 norm; all-zero vectors are left untouched.
    pub fn l2_normalize(&mut self) {
        let norm = self.view().norm();
        if norm > 0.0 {
            for v in &mut self.values {
                *v /= norm;
            }
        }
    }
}

/// Compressed-sparse-row matrix.
///
/// Row `r` occupies `indices[row_offsets[r]..row_offsets[r + 1]]` and the same
/// range of `values`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseMatrix {
    n_cols: usize,
    row_offsets: Vec<usize>,
    indices: Vec<usize>,
    values: Vec<f32>,
}

impl SparseMatrix {
    #[must_use]
    pub fn new(n_cols: usize) -> Self {
        Self {
            n_cols,
            row_offsets: vec![0],
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: SparseVector) {
        debug_assert!(row.indices.iter().all(|&c| c < self.n_cols));
        self.indices.extend(row.indices);
        self.values.extend(row.values);
        self.row_offsets.push(self.indices.len());
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_offsets.len().saturating_sub(1)
    }

    #[must_use]
    pub const fn n_cols(&self) -> usize {
        self.n_cols
    }

    #[must_use]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Row `r`; panics when out of range, like slice indexing.
    #[must_use]
    pub fn row(&self, r: usize) -> SparseView<'_> {
        let (start, end) = (self.row_offsets[r], self.row_offsets[r + 1]);
        SparseView {
            indices: &self.indices[start..end],
            values: &self.values[start..end],
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = SparseView<'_>> + '_ {
        (0..self.row_count()).map(move |r| self.row(r))
    }

    /// Structural checks applied to deserialized matrices.
    pub fn validate(&self) -> Result<(), String> {
        if self.row_offsets.first() != Some(&0) {
            return Err("row_offsets must start at 0".to_string());
        }
        if self.indices.len() != self.values.len() {
            return Err(format!(
                "indices length {} differs from values length {}",
                self.indices.len(),
                self.values.len()
            ));
        }
        if self.row_offsets.last() != Some(&self.indices.len()) {
            return Err("last row offset must equal the number of stored entries".to_string());
        }
        if self.row_offsets.windows(2).any(|w| w[0] > w[1]) {
            return Err("row_offsets must be non-decreasing".to_string());
        }
        for r in 0..self.row_count() {
            let row = self.row(r);
            if row.indices.windows(2).any(|w| w[0] >= w[1]) {
                return Err(format!("row {r} column indices are not strictly increasing"));
            }
            if let Some(&col) = row.indices.last() {
                if col >= self.n_cols {
                    return Err(format!(
                        "row {r} references column {col} but matrix has {} columns",
                        self.n_cols
                    ));
                }
            }
            if row.values.iter().any(|v| !v.is_finite()) {
                return Err(format!("row {r} contains a non-finite weight"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(entries: &[(usize, f32)]) -> SparseVector {
        SparseVector::from_entries(entries.to_vec())
    }

    #[test]
    fn from_entries_sorts_and_drops_zeros() {
        let v = vector(&[(4, 1.0), (1, 2.0), (2, 0.0)]);
        assert_eq!(v.indices, vec![1, 4]);
        assert_eq!(v.values, vec![2.0, 1.0]);
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vector(&[(0, 1.0)]);
        let b = vector(&[(0, 3.0)]);
        assert!((cosine_similarity(&a.view(), &b.view()) - 1.0).abs() < 1e-6);

        let c = vector(&[(0, 1.0)]);
        let d = vector(&[(1, 1.0)]);
        assert!(cosine_similarity(&c.view(), &d.view()).abs() < 1e-6);
    }

    #[test]
    fn cosine_with_zero_vector_is_zero() {
        let a = vector(&[(0, 1.0)]);
        let zero = SparseVector::default();
        assert_eq!(cosine_similarity(&a.view(), &zero.view()), 0.0);
        assert_eq!(cosine_similarity(&zero.view(), &zero.view()), 0.0);
    }

    #[test]
    fn l2_normalize_yields_unit_norm() {
        let mut v = vector(&[(0, 3.0), (2, 4.0)]);
        v.l2_normalize();
        assert!((v.view().norm() - 1.0).abs() < 1e-6);
        assert!((v.values[0] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn matrix_rows_round_trip_in_order() {
        let mut m = SparseMatrix::new(5);
        m.push_row(vector(&[(1, 1.0), (3, 2.0)]));
        m.push_row(SparseVector::default());
        m.push_row(vector(&[(4, 5.0)]));

        assert_eq!(m.row_count(), 3);
        assert_eq!(m.nnz(), 3);
        assert_eq!(m.row(0).indices, &[1, 3]);
        assert_eq!(m.row(1).nnz(), 0);
        assert_eq!(m.row(2).values, &[5.0]);
        assert!(m.validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_column() {
        let mut m = SparseMatrix::new(2);
        m.push_row(vector(&[(0, 1.0)]));
        m.n_cols = 0;
        assert!(m.validate().is_err());
    }

    #[test]
    fn validate_rejects_truncated_values() {
        let mut m = SparseMatrix::new(3);
        m.push_row(vector(&[(0, 1.0), (2, 1.0)]));
        m.values.pop();
        assert!(m.validate().is_err());
    }
}
