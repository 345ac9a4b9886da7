use crate::error::{Result, VectorStoreError};
use crate::sparse::SparseMatrix;
use crate::vectorizer::{TfidfVectorizer, VectorSpaceModel, VectorizerConfig};
use codescout_chunker::CodeChunk;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const INDEX_SCHEMA_VERSION: u32 = 1;

/// The durable search unit: fitted model, chunk matrix, and chunk metadata.
///
/// Row `i` of the matrix always describes `chunks()[i]`.
#[derive(Debug, Clone)]
pub struct Index {
    model: VectorSpaceModel,
    matrix: SparseMatrix,
    chunks: Vec<CodeChunk>,
}

#[derive(Serialize, Deserialize)]
struct PersistedModel {
    config: VectorizerConfig,
    terms: Vec<String>,
    idf: Vec<f32>,
}

#[derive(Serialize, Deserialize)]
struct PersistedIndex {
    schema_version: u32,
    model: PersistedModel,
    matrix: SparseMatrix,
    chunks: Vec<CodeChunk>,
}

impl Index {
    /// Bundle parts, checking that they describe the same corpus and vocabulary.
    pub fn new(
        model: VectorSpaceModel,
        matrix: SparseMatrix,
        chunks: Vec<CodeChunk>,
    ) -> Result<Self> {
        matrix.validate().map_err(VectorStoreError::Inconsistent)?;
        if matrix.row_count() != chunks.len() {
            return Err(VectorStoreError::inconsistent(format!(
                "matrix has {} rows but there are {} chunks",
                matrix.row_count(),
                chunks.len()
            )));
        }
        if matrix.n_cols() != model.vocabulary_size() {
            return Err(VectorStoreError::inconsistent(format!(
                "matrix has {} columns but vocabulary has {} terms",
                matrix.n_cols(),
                model.vocabulary_size()
            )));
        }
        if let Some(bad) = chunks
            .iter()
            .position(|c| c.start_line == 0 || c.start_line > c.end_line)
        {
            return Err(VectorStoreError::inconsistent(format!(
                "chunk {bad} has invalid line range {}-{}",
                chunks[bad].start_line, chunks[bad].end_line
            )));
        }
        Ok(Self {
            model,
            matrix,
            chunks,
        })
    }

    /// Fit a fresh vector space over `chunks`.
    pub fn build(chunks: Vec<CodeChunk>, config: &VectorizerConfig) -> Result<Self> {
        let vectorizer = TfidfVectorizer::new(*config)?;
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let (model, matrix) = vectorizer.fit_transform(&texts)?;
        Self::new(model, matrix, chunks)
    }

    #[must_use]
    pub const fn model(&self) -> &VectorSpaceModel {
        &self.model
    }

    #[must_use]
    pub const fn matrix(&self) -> &SparseMatrix {
        &self.matrix
    }

    #[must_use]
    pub fn chunks(&self) -> &[CodeChunk] {
        &self.chunks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Write the index to `path` atomically (temp file + rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        log::info!("Saving index to {}", path.display());
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let persisted = PersistedIndex {
            schema_version: INDEX_SCHEMA_VERSION,
            model: PersistedModel {
                config: *self.model.config(),
                terms: self.model.terms().to_vec(),
                idf: self.model.idf_weights().to_vec(),
            },
            matrix: self.matrix.clone(),
            chunks: self.chunks.clone(),
        };
        let bytes = serde_json::to_vec(&persisted)?;

        let tmp = tmp_path(path);
        std::fs::write(&tmp, bytes)?;
        if let Err(err) = std::fs::rename(&tmp, path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(err.into());
        }
        log::info!(
            "Index saved: {} chunks, {} terms",
            self.len(),
            self.model.vocabulary_size()
        );
        Ok(())
    }

    /// Read an index written by [`Index::save`], rejecting anything structurally
    /// inconsistent.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading index from {}", path.display());
        let bytes = std::fs::read(path)?;
        let persisted: PersistedIndex = serde_json::from_slice(&bytes)?;
        if persisted.schema_version != INDEX_SCHEMA_VERSION {
            return Err(VectorStoreError::UnsupportedSchema {
                found: persisted.schema_version,
                expected: INDEX_SCHEMA_VERSION,
            });
        }

        let PersistedModel { config, terms, idf } = persisted.model;
        let model = VectorSpaceModel::from_parts(config, terms, idf)?;
        let index = Self::new(model, persisted.matrix, persisted.chunks)?;
        log::info!("Loaded {} chunks", index.len());
        Ok(index)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_chunks() -> Vec<CodeChunk> {
        vec![
            CodeChunk::new(
                "app/routes/login.js".into(),
                1,
                3,
                "export default Route.extend({\n  session: service()\n});".into(),
            ),
            CodeChunk::new(
                "app/styles/app.scss".into(),
                1,
                2,
                ".login-form {\n  color: red;\n}".into(),
            ),
            CodeChunk::new(
                "app/templates/login.hbs".into(),
                1,
                1,
                "{{login-form onSubmit=(action 'authenticate')}}".into(),
            ),
        ]
    }

    #[test]
    fn save_then_load_preserves_structure() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("index.json");
        let index = Index::build(sample_chunks(), &VectorizerConfig::default()).unwrap();

        index.save(&path).unwrap();
        assert!(!tmp_path(&path).exists());

        let loaded = Index::load(&path).unwrap();
        assert_eq!(loaded.chunks(), index.chunks());
        assert_eq!(loaded.model().terms(), index.model().terms());
        assert_eq!(loaded.model().idf_weights(), index.model().idf_weights());
        assert_eq!(loaded.matrix(), index.matrix());
    }

    #[test]
    fn load_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        let err = Index::load(temp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, VectorStoreError::IoError(_)));
    }

    #[test]
    fn load_garbage_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index.json");
        std::fs::write(&path, b"not json at all").unwrap();
        assert!(matches!(
            Index::load(&path),
            Err(VectorStoreError::SerializationError(_))
        ));
    }

    #[test]
    fn load_rejects_row_count_mismatch() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index.json");
        Index::build(sample_chunks(), &VectorizerConfig::default())
            .unwrap()
            .save(&path)
            .unwrap();

        let mut raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        raw["chunks"].as_array_mut().unwrap().pop();
        std::fs::write(&path, serde_json::to_vec(&raw).unwrap()).unwrap();

        let err = Index::load(&path).unwrap_err();
        assert!(matches!(err, VectorStoreError::Inconsistent(_)), "{err}");
    }

    #[test]
    fn load_rejects_vocabulary_size_mismatch() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index.json");
        Index::build(sample_chunks(), &VectorizerConfig::default())
            .unwrap()
            .save(&path)
            .unwrap();

        let mut raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        raw["model"]["terms"].as_array_mut().unwrap().pop();
        raw["model"]["idf"].as_array_mut().unwrap().pop();
        std::fs::write(&path, serde_json::to_vec(&raw).unwrap()).unwrap();

        let err = Index::load(&path).unwrap_err();
        assert!(matches!(err, VectorStoreError::Inconsistent(_)), "{err}");
    }

    #[test]
    fn load_rejects_unknown_schema_version() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index.json");
        Index::build(sample_chunks(), &VectorizerConfig::default())
            .unwrap()
            .save(&path)
            .unwrap();

        let mut raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        raw["schema_version"] = serde_json::json!(99);
        std::fs::write(&path, serde_json::to_vec(&raw).unwrap()).unwrap();

        assert!(matches!(
            Index::load(&path),
            Err(VectorStoreError::UnsupportedSchema { found: 99, .. })
        ));
    }

    #[test]
    fn zero_chunk_index_round_trips() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.json");
        let model =
            VectorSpaceModel::from_parts(VectorizerConfig::default(), vec![], vec![]).unwrap();
        let index = Index::new(model, SparseMatrix::new(0), vec![]).unwrap();

        index.save(&path).unwrap();
        let loaded = Index::load(&path).unwrap();

        assert!(loaded.is_empty());
        assert_eq!(loaded.matrix().row_count(), 0);
        assert_eq!(loaded.model().vocabulary_size(), 0);
    }

    #[test]
    fn build_rejects_empty_corpus() {
        let err = Index::build(Vec::new(), &VectorizerConfig::default()).unwrap_err();
        assert!(matches!(err, VectorStoreError::EmptyCorpus));
    }
}
