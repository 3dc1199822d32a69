//! Scripted API and recording reporter for driving the pipeline in tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use super::events::{RefreshEvent, RefreshReporter};
use super::monitor::PollSample;
use crate::client::{ApiError, DocumentStoreApi, RefreshAck, RefreshVariant};
use crate::models::DocumentStore;

pub fn snapshot(status: &str, chunks: i64) -> DocumentStore {
    DocumentStore {
        status: Some(status.to_string()),
        total_chunks: Some(chunks),
        ..Default::default()
    }
}

pub fn named_store(id: &str, name: &str, chunks: i64) -> DocumentStore {
    DocumentStore {
        id: Some(id.to_string()),
        name: Some(name.to_string()),
        status: Some("UPSERTED".to_string()),
        total_chunks: Some(chunks),
        ..Default::default()
    }
}

/// Per-store scripted responses.
///
/// Refresh scripts are consumed in order and accept once exhausted. Status
/// scripts repeat their final entry forever. A store without a status script
/// reports `UPSERTED`.
#[derive(Default)]
pub struct ScriptedApi {
    stores: Vec<DocumentStore>,
    refresh: Mutex<HashMap<String, VecDeque<Result<(), ApiError>>>>,
    statuses: Mutex<HashMap<String, VecDeque<Result<DocumentStore, ApiError>>>>,
    refresh_calls: Mutex<Vec<(String, RefreshVariant)>>,
    status_calls: Mutex<Vec<String>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stores(mut self, stores: Vec<DocumentStore>) -> Self {
        self.stores = stores;
        self
    }

    pub fn with_refresh(self, store_id: &str, script: Vec<Result<(), ApiError>>) -> Self {
        self.refresh
            .lock()
            .unwrap()
            .insert(store_id.to_string(), script.into());
        self
    }

    pub fn with_statuses(
        self,
        store_id: &str,
        script: Vec<Result<DocumentStore, ApiError>>,
    ) -> Self {
        self.statuses
            .lock()
            .unwrap()
            .insert(store_id.to_string(), script.into());
        self
    }

    pub fn refresh_calls(&self, store_id: &str) -> Vec<RefreshVariant> {
        self.refresh_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| id == store_id)
            .map(|(_, v)| *v)
            .collect()
    }

    pub fn status_calls(&self, store_id: &str) -> usize {
        self.status_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|id| *id == store_id)
            .count()
    }
}

#[async_trait]
impl DocumentStoreApi for ScriptedApi {
    async fn list_stores(&self) -> Result<Vec<DocumentStore>, ApiError> {
        Ok(self.stores.clone())
    }

    async fn get_store(&self, store_id: &str) -> Result<DocumentStore, ApiError> {
        self.status_calls.lock().unwrap().push(store_id.to_string());

        let mut statuses = self.statuses.lock().unwrap();
        let next = match statuses.get_mut(store_id) {
            Some(script) if script.len() > 1 => script.pop_front(),
            Some(script) => script.front().cloned(),
            None => None,
        };

        let mut store = next.unwrap_or_else(|| Ok(snapshot("UPSERTED", 0)))?;
        store.id = Some(store_id.to_string());
        Ok(store)
    }

    async fn request_refresh(
        &self,
        store_id: &str,
        variant: RefreshVariant,
    ) -> Result<RefreshAck, ApiError> {
        self.refresh_calls
            .lock()
            .unwrap()
            .push((store_id.to_string(), variant));

        let next = self
            .refresh
            .lock()
            .unwrap()
            .get_mut(store_id)
            .and_then(|script| script.pop_front())
            .unwrap_or(Ok(()));

        next.map(|()| RefreshAck {
            status: 200,
            body: String::new(),
        })
    }
}

/// Keeps every event it receives.
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<RefreshEvent>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<RefreshEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn samples(&self) -> Vec<PollSample> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                RefreshEvent::Polled { sample, .. } => Some(sample),
                _ => None,
            })
            .collect()
    }

    pub fn poll_failures(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, RefreshEvent::PollFailed { .. }))
            .count()
    }
}

impl RefreshReporter for RecordingReporter {
    fn report(&self, event: RefreshEvent) {
        self.events.lock().unwrap().push(event);
    }
}
