//! Test doubles shared by the unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::store::{DocKey, Document, DocumentStore, MemoryStore, StoreError, TxnCommit, TxnFn};
use crate::supply::{GenerateRequest, SupplyError, WordSupply};

/// `count` distinct words: `{prefix}-0`, `{prefix}-1`, ...
pub fn numbered(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{prefix}-{i}")).collect()
}

/// Word source that replays a fixed script of batch results.
///
/// Once the script runs out it answers with empty batches, or with an
/// outage when built with [`ScriptedSupply::always_failing`].
pub struct ScriptedSupply {
    script: Mutex<VecDeque<Result<Vec<String>, SupplyError>>>,
    requests: Mutex<Vec<GenerateRequest>>,
    fail_when_exhausted: bool,
}

impl ScriptedSupply {
    pub fn new(script: Vec<Result<Vec<String>, SupplyError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
            fail_when_exhausted: false,
        }
    }

    pub fn always_failing() -> Self {
        Self {
            fail_when_exhausted: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn outage() -> SupplyError {
        SupplyError::Status {
            status: 503,
            body: "service unavailable".into(),
        }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl WordSupply for ScriptedSupply {
    async fn generate_batch(&self, request: &GenerateRequest) -> Result<Vec<String>, SupplyError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(result) => result,
            None if self.fail_when_exhausted => Err(Self::outage()),
            None => Ok(Vec::new()),
        }
    }
}

/// [`MemoryStore`] whose writes can be switched off.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn failing() -> Self {
        Self {
            inner: MemoryStore::new(),
            fail_writes: AtomicBool::new(true),
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("writes disabled".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn read(&self, key: &DocKey) -> Result<Option<Document>, StoreError> {
        self.inner.read(key).await
    }

    async fn write(&self, key: &DocKey, doc: Document) -> Result<(), StoreError> {
        self.check()?;
        self.inner.write(key, doc).await
    }

    async fn transaction(&self, keys: &[DocKey], apply: TxnFn<'_>) -> Result<TxnCommit, StoreError> {
        self.check()?;
        self.inner.transaction(keys, apply).await
    }
}
