//! In-Process Document Store
//!
//! `BTreeMap`-backed store with per-document versions for optimistic
//! transactions. Optionally mirrored to a JSON file so decks survive
//! restarts of the demo binary.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::{DocKey, Document, DocumentStore, StoreError, TxnCommit, TxnFn, TxnSnapshot};

/// Default number of optimistic attempts per transaction.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// A document and the store clock value of its last write.
#[derive(Debug, Clone)]
struct Versioned {
    version: u64,
    doc: Document,
}

#[derive(Debug, Clone, Default)]
struct State {
    docs: BTreeMap<DocKey, Versioned>,
    /// Last version handed out. Version 0 means "absent".
    clock: u64,
}

impl State {
    fn version_of(&self, key: &DocKey) -> u64 {
        self.docs.get(key).map(|v| v.version).unwrap_or(0)
    }

    fn put(&mut self, key: DocKey, doc: Document) {
        self.clock += 1;
        let version = self.clock;
        self.docs.insert(key, Versioned { version, doc });
    }
}

/// In-memory [`DocumentStore`].
pub struct MemoryStore {
    state: RwLock<State>,
    max_attempts: u32,
    path: Option<PathBuf>,
}

impl MemoryStore {
    /// Create an empty, purely in-memory store.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            path: None,
        }
    }

    /// Open a store mirrored to `path`, loading it if the file exists.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let mut state = State::default();

        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let docs: BTreeMap<String, Document> = serde_json::from_slice(&bytes)?;
                for (key, doc) in docs {
                    state.put(DocKey(key), doc);
                }
                info!("Loaded {} documents from {}", state.docs.len(), path.display());
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No store file at {}, starting empty", path.display());
            }
            Err(e) => return Err(e.into()),
        }

        Ok(Self {
            state: RwLock::new(state),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            path: Some(path),
        })
    }

    /// Override the transaction attempt limit.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Number of stored documents.
    pub async fn document_count(&self) -> usize {
        self.state.read().await.docs.len()
    }

    /// Apply `writes` to `state`. With a file mirror the new state is staged
    /// and only replaces `state` once it is on disk.
    async fn commit(
        &self,
        state: &mut State,
        writes: impl IntoIterator<Item = (DocKey, Document)>,
    ) -> Result<(), StoreError> {
        if self.path.is_none() {
            for (key, doc) in writes {
                state.put(key, doc);
            }
            return Ok(());
        }

        let mut staged = state.clone();
        for (key, doc) in writes {
            staged.put(key, doc);
        }
        self.persist(&staged).await?;
        *state = staged;
        Ok(())
    }

    /// Mirror `state` to disk (temp file + rename).
    async fn persist(&self, state: &State) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let docs: BTreeMap<&str, &Document> = state
            .docs
            .iter()
            .map(|(key, v)| (key.as_str(), &v.doc))
            .collect();
        let bytes = serde_json::to_vec_pretty(&docs)?;

        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read(&self, key: &DocKey) -> Result<Option<Document>, StoreError> {
        let state = self.state.read().await;
        Ok(state.docs.get(key).map(|v| v.doc.clone()))
    }

    async fn write(&self, key: &DocKey, doc: Document) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        self.commit(&mut state, [(key.clone(), doc)]).await
    }

    async fn transaction(&self, keys: &[DocKey], apply: TxnFn<'_>) -> Result<TxnCommit, StoreError> {
        for attempt in 1..=self.max_attempts {
            // Snapshot the read set along with the versions we saw.
            let (snapshot, seen_versions) = {
                let state = self.state.read().await;
                let mut docs = BTreeMap::new();
                let mut versions = BTreeMap::new();
                for key in keys {
                    let entry = state.docs.get(key);
                    docs.insert(key.clone(), entry.map(|v| v.doc.clone()));
                    versions.insert(key.clone(), entry.map(|v| v.version).unwrap_or(0));
                }
                (TxnSnapshot::new(docs), versions)
            };

            let writes = apply(&snapshot)?;
            if let Some(stray) = writes.iter().find(|w| !snapshot.contains(&w.key)) {
                return Err(StoreError::UnreadKey(stray.key.clone()));
            }

            let mut state = self.state.write().await;
            let conflicted = seen_versions
                .iter()
                .any(|(key, version)| state.version_of(key) != *version);
            if conflicted {
                debug!(attempt, "Transaction conflict, retrying");
                continue;
            }

            if !writes.is_empty() {
                let staged = writes.iter().map(|w| (w.key.clone(), w.doc.clone()));
                self.commit(&mut state, staged).await?;
            }
            return Ok(TxnCommit::new(writes));
        }

        warn!("Transaction gave up after {} attempts", self.max_attempts);
        Err(StoreError::Contention { attempts: self.max_attempts })
    }
}

// =============================================================================
// TESTS
// =============================================================================
