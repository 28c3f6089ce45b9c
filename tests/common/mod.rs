#![allow(dead_code)]

use bossmodules::services::{FeedResponse, TransportError};
use bossmodules::{BossModuleManager, FeedTransport, SettingsStore};
use camino::Utf8PathBuf;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::runtime::Handle;
use tokio::sync::Semaphore;

/// In-memory feed: replays scripted responses in order and records every
/// requested URL. When gated, each request waits for [`ScriptedTransport::release`].
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    inner: Arc<ScriptedInner>,
}

struct ScriptedInner {
    responses: Mutex<VecDeque<Result<FeedResponse, String>>>,
    requests: Mutex<Vec<String>>,
    gated: bool,
    gate: Semaphore,
}

impl Default for ScriptedInner {
    fn default() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            gated: false,
            gate: Semaphore::new(0),
        }
    }
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated() -> Self {
        Self {
            inner: Arc::new(ScriptedInner {
                gated: true,
                ..ScriptedInner::default()
            }),
        }
    }

    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.inner.responses.lock().unwrap().push_back(Ok(FeedResponse {
            status,
            body: body.into(),
        }));
        self
    }

    /// Queue a 200 response wrapping `modules` as the feed's module array.
    pub fn respond_modules(self, modules: Value) -> Self {
        self.respond(200, feed_body(modules))
    }

    pub fn fail(self, message: &str) -> Self {
        self.inner
            .responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    /// Let one pending request proceed.
    pub fn release(&self) {
        self.inner.gate.add_permits(1);
    }

    pub fn requests(&self) -> Vec<String> {
        self.inner.requests.lock().unwrap().clone()
    }
}

impl FeedTransport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<FeedResponse, TransportError> {
        self.inner.requests.lock().unwrap().push(url.to_string());

        if self.inner.gated {
            self.inner.gate.acquire().await.unwrap().forget();
        }

        let next = self.inner.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(TransportError::Unreachable(message)),
            None => Err(TransportError::Unreachable(
                "no scripted response left".to_string(),
            )),
        }
    }
}

pub fn feed_body(modules: Value) -> String {
    serde_json::json!({ "KtaneModules": modules }).to_string()
}

/// Fresh data directory with a store at the standard location.
pub fn temp_store() -> (SettingsStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (SettingsStore::in_data_dir(&data_dir), temp_dir)
}

/// Manager over a fresh store, not yet refreshed. Must run inside a runtime.
pub fn test_manager(
    transport: ScriptedTransport,
) -> (BossModuleManager<ScriptedTransport>, TempDir) {
    let (store, temp_dir) = temp_store();
    let manager = BossModuleManager::new(store, transport, Handle::current());
    (manager, temp_dir)
}

/// The two-module feed used across scenarios.
pub fn two_module_feed() -> Value {
    serde_json::json!([
        {"Name": "Module A", "ModuleID": "modA", "Ignore": ["Module B"]},
        {"Name": "Module B", "ModuleID": "modB", "Ignore": []}
    ])
}
