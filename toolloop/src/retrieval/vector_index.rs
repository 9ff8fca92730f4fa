//! Persisted vector index: chunks + embeddings in one SQLite file per collection,
//! searched in memory by cosine similarity.
//!
//! The file lives at `<persist_dir>/<collection>.sqlite3`. Vectors are stored as
//! little-endian `f32` blobs. All SQLite access runs in `spawn_blocking`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusqlite::params;

use super::embedder::Embedder;
use super::loader::load_document;
use super::splitter::RecursiveCharacterSplitter;
use super::RetrievalError;

pub const DEFAULT_PERSIST_DIR: &str = "./embedding";
pub const DEFAULT_COLLECTION: &str = "da_ri";

/// One search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub content: String,
    pub score: f32,
}

#[derive(Debug, Clone)]
struct Entry {
    content: String,
    vector: Vec<f32>,
}

/// Chunks of one collection with their embeddings.
///
/// Entries are loaded into memory on open; `add_texts` writes through to SQLite.
pub struct VectorIndex {
    db_path: PathBuf,
    collection: String,
    embedder: Arc<dyn Embedder>,
    entries: Vec<Entry>,
}

impl std::fmt::Debug for VectorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorIndex")
            .field("db_path", &self.db_path)
            .field("collection", &self.collection)
            .field("len", &self.entries.len())
            .finish()
    }
}

fn encode_vector(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|x| x.to_le_bytes()).collect()
}

fn decode_vector(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

/// Cosine similarity; 0.0 when either vector has zero magnitude or the lengths differ.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

impl VectorIndex {
    /// Opens (creating if needed) the collection under `persist_dir` and loads its entries.
    pub async fn open(
        persist_dir: impl AsRef<Path>,
        collection: &str,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self, RetrievalError> {
        let persist_dir = persist_dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&persist_dir).await?;
        let db_path = persist_dir.join(format!("{}.sqlite3", collection));

        let path = db_path.clone();
        let entries = tokio::task::spawn_blocking(move || {
            let conn = rusqlite::Connection::open(&path)?;
            conn.execute(
                r#"
                CREATE TABLE IF NOT EXISTS chunks (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    content TEXT NOT NULL,
                    vector BLOB NOT NULL
                )
                "#,
                [],
            )?;
            let mut stmt = conn.prepare("SELECT content, vector FROM chunks ORDER BY id")?;
            let rows = stmt.query_map([], |row| {
                let content: String = row.get(0)?;
                let bytes: Vec<u8> = row.get(1)?;
                Ok(Entry {
                    content,
                    vector: decode_vector(&bytes),
                })
            })?;
            let entries = rows.collect::<Result<Vec<_>, _>>()?;
            Ok::<_, RetrievalError>(entries)
        })
        .await
        .map_err(|e| RetrievalError::Storage(e.to_string()))??;

        tracing::debug!(path = %db_path.display(), chunks = entries.len(), "vector index opened");
        Ok(Self {
            db_path,
            collection: collection.to_string(),
            embedder,
            entries,
        })
    }

    /// Opens the collection and, when it is empty, fills it from `document`.
    ///
    /// A non-empty persisted collection is reused as is; the document is not read.
    pub async fn open_or_build(
        document: impl AsRef<Path>,
        persist_dir: impl AsRef<Path>,
        collection: &str,
        splitter: &RecursiveCharacterSplitter,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self, RetrievalError> {
        let mut index = Self::open(persist_dir, collection, embedder).await?;
        if !index.is_empty() {
            tracing::info!(
                collection,
                chunks = index.len(),
                "reusing persisted collection"
            );
            return Ok(index);
        }
        let text = load_document(document).await?;
        let chunks = splitter.split_text(&text);
        let added = index.add_texts(chunks).await?;
        tracing::info!(collection, chunks = added, "collection built");
        Ok(index)
    }

    /// Embeds `texts` and appends them to the collection. Returns how many were added.
    pub async fn add_texts(&mut self, texts: Vec<String>) -> Result<usize, RetrievalError> {
        if texts.is_empty() {
            return Ok(0);
        }
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let vectors = self.embedder.embed(&refs).await?;
        if vectors.len() != texts.len() {
            return Err(RetrievalError::Embedding(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                vectors.len()
            )));
        }
        let new_entries: Vec<Entry> = texts
            .into_iter()
            .zip(vectors)
            .map(|(content, vector)| Entry { content, vector })
            .collect();

        let path = self.db_path.clone();
        let rows = new_entries.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = rusqlite::Connection::open(&path)?;
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare("INSERT INTO chunks (content, vector) VALUES (?1, ?2)")?;
                for entry in &rows {
                    stmt.execute(params![entry.content, encode_vector(&entry.vector)])?;
                }
            }
            tx.commit()?;
            Ok::<(), RetrievalError>(())
        })
        .await
        .map_err(|e| RetrievalError::Storage(e.to_string()))??;

        let added = new_entries.len();
        self.entries.extend(new_entries);
        Ok(added)
    }

    /// Top-`k` chunks by cosine similarity to `query`, best first.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>, RetrievalError> {
        if k == 0 || self.entries.is_empty() {
            return Ok(Vec::new());
        }
        let query_vec = self
            .embedder
            .embed(&[query])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RetrievalError::Embedding("no embedding returned for query".into()))?;

        let mut hits: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|e| ScoredChunk {
                content: e.content.clone(),
                score: cosine_similarity(&query_vec, &e.vector),
            })
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(k);
        Ok(hits)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}
