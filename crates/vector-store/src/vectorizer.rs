use crate::analyzer::term_counts;
use crate::error::{Result, VectorStoreError};
use crate::sparse::{SparseMatrix, SparseVector};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Settings of the character n-gram TF-IDF vectorizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    /// Shortest n-gram length (inclusive)
    pub min_n: usize,

    /// Longest n-gram length (inclusive)
    pub max_n: usize,

    /// Minimum number of chunks an n-gram must occur in to enter the vocabulary
    pub min_df: usize,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            min_n: 3,
            max_n: 5,
            min_df: 1,
        }
    }
}

impl VectorizerConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.min_n == 0 {
            return Err("min_n must be > 0".to_string());
        }
        if self.min_n > self.max_n {
            return Err(format!(
                "min_n ({}) cannot exceed max_n ({})",
                self.min_n, self.max_n
            ));
        }
        if self.min_df == 0 {
            return Err("min_df must be > 0".to_string());
        }
        Ok(())
    }
}

/// Fitted vocabulary and idf weights. Immutable once built.
#[derive(Debug, Clone)]
pub struct VectorSpaceModel {
    config: VectorizerConfig,
    terms: Vec<String>,
    idf: Vec<f32>,
    vocabulary: HashMap<String, usize>,
}

impl VectorSpaceModel {
    /// Assemble a model from persisted parts; column `i` is `terms[i]`.
    pub fn from_parts(
        config: VectorizerConfig,
        terms: Vec<String>,
        idf: Vec<f32>,
    ) -> Result<Self> {
        config.validate().map_err(VectorStoreError::InvalidConfig)?;
        if terms.len() != idf.len() {
            return Err(VectorStoreError::inconsistent(format!(
                "vocabulary has {} terms but {} idf weights",
                terms.len(),
                idf.len()
            )));
        }
        if let Some(bad) = idf.iter().position(|w| !w.is_finite() || *w <= 0.0) {
            return Err(VectorStoreError::inconsistent(format!(
                "idf weight for column {bad} is not a positive number"
            )));
        }

        let mut vocabulary = HashMap::with_capacity(terms.len());
        for (col, term) in terms.iter().enumerate() {
            if vocabulary.insert(term.clone(), col).is_some() {
                return Err(VectorStoreError::inconsistent(format!(
                    "duplicate vocabulary term {term:?}"
                )));
            }
        }

        Ok(Self {
            config,
            terms,
            idf,
            vocabulary,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    /// Vocabulary terms in column order
    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    #[must_use]
    pub fn idf_weights(&self) -> &[f32] {
        &self.idf
    }

    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn column_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Project arbitrary text onto the fitted vocabulary.
    ///
    /// Out-of-vocabulary n-grams are dropped; the result is L2-normalized and may be
    /// the zero vector.
    #[must_use]
    pub fn transform(&self, text: &str) -> SparseVector {
        let counts = term_counts(text, self.config.min_n, self.config.max_n);
        self.weigh(&counts)
    }

    fn weigh(&self, counts: &HashMap<String, u32>) -> SparseVector {
        let entries = counts
            .iter()
            .filter_map(|(term, &count)| {
                let col = self.column_of(term)?;
                Some((col, count as f32 * self.idf[col]))
            })
            .collect();
        let mut row = SparseVector::from_entries(entries);
        row.l2_normalize();
        row
    }
}

/// Learns a [`VectorSpaceModel`] from a corpus and encodes it as a [`SparseMatrix`]
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    config: VectorizerConfig,
}

impl TfidfVectorizer {
    pub fn new(config: VectorizerConfig) -> Result<Self> {
        config.validate().map_err(VectorStoreError::InvalidConfig)?;
        Ok(Self { config })
    }

    /// Fit vocabulary and idf on `documents`, returning the model and one row per
    /// document in input order.
    pub fn fit_transform<S: AsRef<str>>(
        &self,
        documents: &[S],
    ) -> Result<(VectorSpaceModel, SparseMatrix)> {
        if documents.is_empty() {
            return Err(VectorStoreError::EmptyCorpus);
        }

        let counts: Vec<HashMap<String, u32>> = documents
            .iter()
            .map(|doc| term_counts(doc.as_ref(), self.config.min_n, self.config.max_n))
            .collect();

        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in &counts {
            for term in doc.keys() {
                *document_frequency.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let n_docs = counts.len() as f64;
        let (terms, idf): (Vec<String>, Vec<f32>) = document_frequency
            .into_iter()
            .filter(|(_, df)| *df >= self.config.min_df)
            .map(|(term, df)| {
                let weight = ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0;
                (term.to_string(), weight as f32)
            })
            .unzip();

        let model = VectorSpaceModel::from_parts(self.config, terms, idf)?;
        let mut matrix = SparseMatrix::new(model.vocabulary_size());
        for doc in &counts {
            matrix.push_row(model.weigh(doc));
        }

        log::debug!(
            "Fitted vector space: {} documents, {} terms, {} non-zeros",
            counts.len(),
            model.vocabulary_size(),
            matrix.nnz()
        );

        Ok((model, matrix))
    }
}
