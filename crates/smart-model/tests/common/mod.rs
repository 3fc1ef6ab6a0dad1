//! Collaborator doubles shared by the integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use smart_model::{
    Attributes, InputSource, ModelError, ModelResult, PersistOptions, Persistence, RelationHandle, RelationLoader,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("smart_model=debug")
        .with_test_writer()
        .try_init();
}

pub fn attrs(pairs: &[(&str, Value)]) -> Attributes {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

/// One write seen by `RecordingPersistence`
#[derive(Debug, Clone)]
pub struct SavedRow {
    pub table: String,
    pub attributes: Attributes,
    pub options: PersistOptions,
}

/// Records every write and optionally assigns an `id`
#[derive(Debug, Default)]
pub struct RecordingPersistence {
    rows: Mutex<Vec<SavedRow>>,
    next_id: Option<i64>,
    reject: bool,
    fail: bool,
}

impl RecordingPersistence {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn assigning_ids(first: i64) -> Arc<Self> {
        Arc::new(Self {
            next_id: Some(first),
            ..Self::default()
        })
    }

    /// Reports every write as not performed
    pub fn rejecting() -> Arc<Self> {
        Arc::new(Self {
            reject: true,
            ..Self::default()
        })
    }

    /// Records the write, then reports a storage error
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn rows(&self) -> Vec<SavedRow> {
        self.rows.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<SavedRow> {
        self.rows.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Persistence for RecordingPersistence {
    async fn save(&self, table: &str, attributes: &mut Attributes, options: &PersistOptions) -> ModelResult<bool> {
        if let Some(id) = self.next_id {
            if !attributes.contains_key("id") {
                let id = id + self.rows.lock().unwrap().len() as i64;
                attributes.insert("id".to_string(), Value::from(id));
            }
        }
        self.rows.lock().unwrap().push(SavedRow {
            table: table.to_string(),
            attributes: attributes.clone(),
            options: options.clone(),
        });
        if self.fail {
            return Err(ModelError::Persistence(format!("write to '{}' failed", table)));
        }
        Ok(!self.reject)
    }
}

/// Serves fixed rows and counts how often it is asked
#[derive(Debug, Default)]
pub struct CountingLoader {
    calls: AtomicUsize,
    rows: Vec<Attributes>,
    seen: Mutex<Vec<RelationHandle>>,
    fail: bool,
}

impl CountingLoader {
    pub fn with_rows(rows: Vec<Attributes>) -> Arc<Self> {
        Arc::new(Self {
            rows,
            ..Self::default()
        })
    }

    /// Counts each request, then fails it
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn answer(&self, relation: &RelationHandle) -> ModelResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(relation.clone());
        if self.fail {
            return Err(ModelError::Persistence(format!("cannot load '{}'", relation.name())));
        }
        Ok(())
    }

    pub fn seen(&self) -> Vec<RelationHandle> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl RelationLoader for CountingLoader {
    async fn load_one(&self, relation: &RelationHandle, _parent: &Attributes) -> ModelResult<Option<Attributes>> {
        self.answer(relation)?;
        Ok(self.rows.first().cloned())
    }

    async fn load_many(&self, relation: &RelationHandle, _parent: &Attributes) -> ModelResult<Vec<Attributes>> {
        self.answer(relation)?;
        Ok(self.rows.clone())
    }
}

/// Request input with an optional session
#[derive(Debug, Default)]
pub struct StaticInput {
    data: Attributes,
    session: bool,
    flashes: AtomicUsize,
}

impl StaticInput {
    pub fn new(data: Attributes, session: bool) -> Arc<Self> {
        Arc::new(Self {
            data,
            session,
            flashes: AtomicUsize::new(0),
        })
    }

    pub fn flashes(&self) -> usize {
        self.flashes.load(Ordering::SeqCst)
    }
}

impl InputSource for StaticInput {
    fn all(&self) -> Attributes {
        self.data.clone()
    }

    fn has_session(&self) -> bool {
        self.session
    }

    fn flash(&self) {
        self.flashes.fetch_add(1, Ordering::SeqCst);
    }
}
