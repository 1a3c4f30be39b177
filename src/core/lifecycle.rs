//! Create / list / delete lifecycle of an owner's collection.
//!
//! Every successful mutation is followed by a full reload; the collection is
//! never patched locally. Loads are sequenced with a generation counter so a
//! slow, older response can never overwrite a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, instrument, warn};

use crate::adapters::ContentStore;
use crate::auth::{AuthToken, CredentialProvider};
use crate::core::error::ContentError;
use crate::core::session::clear_rejected_token;
use crate::library::{Collection, ContentId, NewContent};

/// State of a collection view
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CollectionState {
    /// Nothing requested yet
    #[default]
    Idle,

    /// A load is in flight
    Loading,

    /// Last applied load succeeded
    Ready(Collection),

    /// No session, or the store rejected it; sign in again
    Unauthorized,

    /// Last applied load failed with this user-facing message
    Failed(String),
}

/// Explicit, cancelable gate in front of destructive operations
pub trait Confirm: Send + Sync {
    /// Ask the user; true means go ahead
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Gate that always agrees (`--yes`)
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Reload that follows a mutation the store already accepted
#[derive(Debug, Clone, PartialEq)]
pub enum Refreshed {
    /// Reload succeeded
    Current(Collection),

    /// Reload failed; the displayed collection was left as it was
    Stale(ContentError),
}

impl Refreshed {
    /// The reloaded collection, if the reload succeeded
    pub fn collection(&self) -> Option<&Collection> {
        match self {
            Refreshed::Current(collection) => Some(collection),
            Refreshed::Stale(_) => None,
        }
    }

    pub fn is_current(&self) -> bool {
        matches!(self, Refreshed::Current(_))
    }
}

/// Result of a remove request
#[derive(Debug, Clone, PartialEq)]
pub enum RemoveOutcome {
    /// Deleted by the store; carries the reload that followed
    Removed(Refreshed),

    /// The user declined; nothing was sent
    Cancelled,
}

#[derive(Debug, Default)]
struct ViewState {
    state: CollectionState,
    /// Generation of the last load whose result was applied
    applied: u64,
    closed: bool,
}

/// Drives one collection view against the remote store
pub struct LifecycleController {
    store: Arc<dyn ContentStore>,
    credentials: Arc<dyn CredentialProvider>,
    view: Mutex<ViewState>,
    issued: AtomicU64,
}

impl LifecycleController {
    pub fn new(store: Arc<dyn ContentStore>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            store,
            credentials,
            view: Mutex::new(ViewState::default()),
            issued: AtomicU64::new(0),
        }
    }

    /// Current state snapshot
    pub fn state(&self) -> CollectionState {
        self.view().state.clone()
    }

    /// Currently displayed collection, if loaded
    pub fn collection(&self) -> Option<Collection> {
        match &self.view().state {
            CollectionState::Ready(collection) => Some(collection.clone()),
            _ => None,
        }
    }

    /// Detach from the view. Requests completing afterwards leave state alone.
    pub fn close(&self) {
        self.view().closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.view().closed
    }

    fn view(&self) -> MutexGuard<'_, ViewState> {
        // State is replaced wholesale, so a poisoned guard is still consistent
        self.view.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn mark_loading(&self, generation: u64) {
        let mut view = self.view();
        if !view.closed && generation > view.applied {
            view.state = CollectionState::Loading;
        }
    }

    /// Apply a load result unless the view is closed or a newer load won
    fn apply(&self, generation: u64, state: CollectionState) -> bool {
        let mut view = self.view();
        if view.closed {
            debug!(generation, "View closed, discarding load result");
            return false;
        }
        if generation <= view.applied {
            debug!(generation, applied = view.applied, "Stale load result discarded");
            return false;
        }
        view.state = state;
        view.applied = generation;
        true
    }

    fn next_generation(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Move to `Unauthorized` outside of a load (add / remove rejected)
    fn sign_out(&self, rejected: bool) {
        if rejected {
            clear_rejected_token(self.credentials.as_ref());
        }
        let generation = self.next_generation();
        self.apply(generation, CollectionState::Unauthorized);
    }

    fn token(&self) -> Result<Option<AuthToken>, ContentError> {
        self.credentials.get()
    }

    /// Fetch the owner's collection and replace the displayed one.
    ///
    /// Without a stored token this goes straight to `Unauthorized` and makes
    /// no request.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<Collection, ContentError> {
        self.fetch(true).await
    }

    /// Reload after an acknowledged mutation.
    ///
    /// A failure other than `Unauthorized` keeps the displayed collection.
    async fn refresh(&self) -> Refreshed {
        match self.fetch(false).await {
            Ok(collection) => Refreshed::Current(collection),
            Err(e) => {
                warn!(error = %e, "Change accepted but reload failed");
                Refreshed::Stale(e)
            }
        }
    }

    async fn fetch(&self, replace_on_failure: bool) -> Result<Collection, ContentError> {
        let generation = self.next_generation();

        let token = match self.token() {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("No session token, not loading");
                self.apply(generation, CollectionState::Unauthorized);
                return Err(ContentError::Unauthorized);
            }
            Err(e) => {
                if replace_on_failure {
                    self.apply(generation, CollectionState::Failed(e.user_message()));
                }
                return Err(e);
            }
        };

        if replace_on_failure {
            self.mark_loading(generation);
        }

        match self.store.list_content(&token).await {
            Ok(items) => {
                let collection = Collection::from_items(items);
                info!(generation, count = collection.len(), "Collection loaded");
                self.apply(generation, CollectionState::Ready(collection.clone()));
                Ok(collection)
            }
            Err(ContentError::Unauthorized) => {
                clear_rejected_token(self.credentials.as_ref());
                self.apply(generation, CollectionState::Unauthorized);
                Err(ContentError::Unauthorized)
            }
            Err(e) => {
                warn!(generation, error = %e, "Failed to load collection");
                if replace_on_failure {
                    self.apply(generation, CollectionState::Failed(e.user_message()));
                }
                Err(e)
            }
        }
    }

    /// Validate and create an item, then reload.
    ///
    /// Invalid input is rejected before any request. On failure the
    /// displayed collection is left as it was. Once the store accepts the
    /// item this returns `Ok`, whether or not the reload succeeds.
    #[instrument(skip_all, fields(link = %content.link))]
    pub async fn add(&self, content: &NewContent) -> Result<Refreshed, ContentError> {
        let request = match content.validate() {
            Ok(request) => request,
            Err(e) => {
                debug!(error = %e, "Rejected invalid content");
                return Err(e.into());
            }
        };

        let Some(token) = self.token()? else {
            self.sign_out(false);
            return Err(ContentError::Unauthorized);
        };

        match self.store.create_content(&token, &request).await {
            Ok(()) => {
                info!(kind = %request.kind, "Content created");
                Ok(self.refresh().await)
            }
            Err(ContentError::Unauthorized) => {
                self.sign_out(true);
                Err(ContentError::Unauthorized)
            }
            Err(e) => {
                warn!(error = %e, "Failed to create content");
                Err(e)
            }
        }
    }

    /// Delete an item after the user confirms, then reload.
    ///
    /// The item stays displayed until the store acknowledges the delete.
    #[instrument(skip(self, confirm), fields(id = %id))]
    pub async fn remove(
        &self,
        id: &ContentId,
        confirm: &dyn Confirm,
    ) -> Result<RemoveOutcome, ContentError> {
        let prompt = match self.collection().and_then(|c| c.get(id).map(|i| i.title.clone())) {
            Some(title) => format!("Delete '{}'?", title),
            None => format!("Delete item {}?", id),
        };

        if !confirm.confirm(&prompt) {
            debug!("Delete cancelled");
            return Ok(RemoveOutcome::Cancelled);
        }

        let Some(token) = self.token()? else {
            self.sign_out(false);
            return Err(ContentError::Unauthorized);
        };

        match self.store.delete_content(&token, id).await {
            Ok(()) => {
                info!("Content deleted");
                Ok(RemoveOutcome::Removed(self.refresh().await))
            }
            Err(ContentError::Unauthorized) => {
                self.sign_out(true);
                Err(ContentError::Unauthorized)
            }
            Err(e) => {
                warn!(error = %e, "Failed to delete content");
                Err(e)
            }
        }
    }
}
