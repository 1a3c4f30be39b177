//! In-memory content store and clipboards shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::oneshot;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;

use brainlink::auth::{AuthToken, CredentialProvider, Credentials, MemoryTokenStore};
use brainlink::library::{ContentId, ContentItem, CreateContent};
use brainlink::{Clipboard, ContentError, ContentStore};

pub const TOKEN: &str = "token-alice";
pub const SHARE_TOKEN: &str = "share-abc123";

/// Fake store: records every call, can fail or hold individual operations
#[derive(Default)]
pub struct FakeStore {
    items: Mutex<Vec<ContentItem>>,
    next_id: AtomicU64,
    calls: Mutex<Vec<&'static str>>,
    failures: Mutex<HashMap<&'static str, ContentError>>,
    list_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    share_token: Mutex<Option<String>>,
}

impl FakeStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_items(items: Vec<ContentItem>) -> Arc<Self> {
        let store = Self::default();
        store.next_id.store(items.len() as u64, Ordering::SeqCst);
        *store.items.lock().unwrap() = items;
        Arc::new(store)
    }

    /// Add an item behind the controller's back
    pub fn insert(&self, item: ContentItem) {
        self.items.lock().unwrap().push(item);
    }

    pub fn items(&self) -> Vec<ContentItem> {
        self.items.lock().unwrap().clone()
    }

    /// Make the next call of `op` fail with `err`
    pub fn fail_next(&self, op: &'static str, err: ContentError) {
        self.failures.lock().unwrap().insert(op, err);
    }

    /// Hold the next `list_content` response until the sender fires.
    ///
    /// The response reflects the items at the time of the call.
    pub fn gate_next_list(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.list_gates.lock().unwrap().push_back(rx);
        tx
    }

    pub fn calls(&self, op: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == op).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn share_token(&self) -> Option<String> {
        self.share_token.lock().unwrap().clone()
    }

    fn record(&self, op: &'static str) -> Result<(), ContentError> {
        self.calls.lock().unwrap().push(op);
        match self.failures.lock().unwrap().remove(op) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ContentStore for FakeStore {
    async fn sign_up(&self, _credentials: &Credentials) -> Result<(), ContentError> {
        self.record("sign_up")
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthToken, ContentError> {
        self.record("sign_in")?;
        if credentials.password == "wrong" {
            return Err(ContentError::Remote {
                status: 403,
                message: Some("Incorrect credentials".to_string()),
            });
        }
        Ok(AuthToken::new(format!("token-{}", credentials.username)))
    }

    async fn list_content(&self, _token: &AuthToken) -> Result<Vec<ContentItem>, ContentError> {
        self.record("list_content")?;
        let snapshot = self.items();
        let gate = self.list_gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        Ok(snapshot)
    }

    async fn create_content(
        &self,
        _token: &AuthToken,
        content: &CreateContent,
    ) -> Result<(), ContentError> {
        self.record("create_content")?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let item = ContentItem::new(
            id.to_string(),
            content.title.clone(),
            content.link.clone(),
            Some(content.kind),
        )
        .with_tags(content.tags.iter());
        self.insert(item);
        Ok(())
    }

    async fn delete_content(&self, _token: &AuthToken, id: &ContentId) -> Result<(), ContentError> {
        self.record("delete_content")?;
        self.items.lock().unwrap().retain(|item| &item.id != id);
        Ok(())
    }

    async fn create_share_link(&self, _token: &AuthToken) -> Result<String, ContentError> {
        self.record("create_share_link")?;
        *self.share_token.lock().unwrap() = Some(SHARE_TOKEN.to_string());
        Ok(SHARE_TOKEN.to_string())
    }

    async fn disable_sharing(&self, _token: &AuthToken) -> Result<(), ContentError> {
        self.record("disable_sharing")?;
        *self.share_token.lock().unwrap() = None;
        Ok(())
    }

    async fn list_shared(&self, share_token: &str) -> Result<Vec<ContentItem>, ContentError> {
        self.record("list_shared")?;
        match self.share_token() {
            Some(current) if current == share_token => Ok(self.items()),
            _ => Err(ContentError::NotFound),
        }
    }
}

/// Token slot that already holds a session
pub fn signed_in() -> Arc<MemoryTokenStore> {
    Arc::new(MemoryTokenStore::with_token(TOKEN))
}

pub fn signed_out() -> Arc<MemoryTokenStore> {
    Arc::new(MemoryTokenStore::new())
}

pub fn has_token(credentials: &dyn CredentialProvider) -> bool {
    credentials.get().unwrap().is_some()
}

/// Clipboard that remembers what it was given
#[derive(Default)]
pub struct RecordingClipboard {
    pub copied: Mutex<Vec<String>>,
}

#[async_trait]
impl Clipboard for RecordingClipboard {
    fn name(&self) -> &str {
        "recording"
    }

    async fn copy(&self, text: &str) -> Result<()> {
        self.copied.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Log output of this crate, captured for the current thread
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Record every brainlink event, spans included, until the guard drops
pub fn capture_logs() -> (LogCapture, DefaultGuard) {
    let capture = LogCapture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("brainlink=trace"))
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    (capture, tracing::subscriber::set_default(subscriber))
}
