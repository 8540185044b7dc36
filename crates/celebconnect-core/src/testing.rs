//! In-crate test doubles for the gateway ports.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportError;
use crate::types::{ApiRequest, ApiResponse, BaseUrl, Method, SessionRecord};
use crate::{GatewayConfig, Navigator, Result, SessionGateway, SessionStore, Transport};

/// A canned reaction to one request.
#[derive(Clone)]
pub enum Reply {
    Json(u16, Value),
    Fail,
    Hang,
}

/// Transport that answers from per-path scripts and records every call.
///
/// The last reply in a script repeats forever.
pub struct ScriptedTransport {
    base: BaseUrl,
    scripts: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<(Method, String)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            base: BaseUrl::new("https://api.celebconnect.test").unwrap(),
            scripts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn script(&self, path: &str, replies: Vec<Reply>) {
        self.scripts
            .lock()
            .unwrap()
            .insert(path.to_string(), replies.into());
    }

    pub fn calls(&self) -> Vec<(Method, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.calls().iter().filter(|(_, p)| p == path).count()
    }

    fn next_reply(&self, path: &str) -> Reply {
        let mut scripts = self.scripts.lock().unwrap();
        let queue = scripts
            .get_mut(path)
            .unwrap_or_else(|| panic!("no script for {}", path));
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap()
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    fn base_url(&self) -> &BaseUrl {
        &self.base
    }

    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let path = request.path().as_str().to_string();
        self.calls
            .lock()
            .unwrap()
            .push((request.method(), path.clone()));

        match self.next_reply(&path) {
            Reply::Json(status, body) => Ok(ApiResponse::json(status, &body)),
            Reply::Fail => Err(TransportError::Connection {
                message: "connection refused".to_string(),
            }
            .into()),
            Reply::Hang => std::future::pending().await,
        }
    }
}

/// Single-slot in-memory store.
#[derive(Default)]
pub struct SlotStore {
    slot: Mutex<Option<SessionRecord>>,
}

impl SlotStore {
    pub fn with(record: SessionRecord) -> Self {
        Self {
            slot: Mutex::new(Some(record)),
        }
    }
}

impl SessionStore for SlotStore {
    fn get(&self) -> Result<Option<SessionRecord>> {
        Ok(self.slot.lock().unwrap().clone())
    }

    fn set(&self, record: &SessionRecord) -> Result<()> {
        *self.slot.lock().unwrap() = Some(record.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.lock().unwrap() = None;
        Ok(())
    }
}

/// Navigator that records redirects and whether the store was empty at the time.
pub struct RecordingNavigator {
    location: String,
    store: Arc<dyn SessionStore>,
    redirects: Mutex<Vec<(String, bool)>>,
}

impl RecordingNavigator {
    pub fn new(location: &str, store: Arc<dyn SessionStore>) -> Self {
        Self {
            location: location.to_string(),
            store,
            redirects: Mutex::new(Vec::new()),
        }
    }

    /// Returns `(path, store_was_empty)` for each navigation.
    pub fn redirects(&self) -> Vec<(String, bool)> {
        self.redirects.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.location.clone()
    }

    fn navigate_to(&self, path: &str) {
        let empty = matches!(self.store.get(), Ok(None));
        self.redirects.lock().unwrap().push((path.to_string(), empty));
    }
}

/// Everything a gateway test needs.
pub struct Harness {
    pub transport: Arc<ScriptedTransport>,
    pub store: Arc<SlotStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub gateway: SessionGateway,
}

impl Harness {
    pub fn new(session: Option<SessionRecord>, location: &str) -> Self {
        Self::with_config(session, location, &GatewayConfig::default())
    }

    pub fn with_config(
        session: Option<SessionRecord>,
        location: &str,
        config: &GatewayConfig,
    ) -> Self {
        let transport = Arc::new(ScriptedTransport::new());
        let store = Arc::new(match session {
            Some(record) => SlotStore::with(record),
            None => SlotStore::default(),
        });
        let navigator = Arc::new(RecordingNavigator::new(location, store.clone()));
        let gateway = SessionGateway::new(transport.clone(), store.clone(), navigator.clone(), config);
        Self {
            transport,
            store,
            navigator,
            gateway,
        }
    }
}
