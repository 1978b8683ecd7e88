//! Stand-ins for the remote services behind each action.
//!
//! Every action the app dispatches goes through one of these traits, so the
//! simulated implementations here can be swapped for real clients or for
//! test fakes without touching the controller.

use crate::analysis::{MoodAnalyzer, SimulatedAnalyzer};
use crate::config::Config;
use crate::diary_entry::Mood;
use crate::error::{AuthError, SaveError};
use crate::session::{Credentials, SignUpDetails};
use crate::share::{FileShareTarget, ShareTarget};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<(), AuthError>;

    async fn sign_up(&self, details: &SignUpDetails) -> Result<(), AuthError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub display_name: Option<String>,
}

/// Third-party sign-in (the "Continue with Google" button).
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn authenticate(&self) -> Result<Identity, AuthError>;
}

/// Snapshot of the editor taken when a save is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub content: String,
    pub mood: Mood,
}

/// Remote write that must succeed before an entry lands in the store.
#[async_trait]
pub trait EntrySink: Send + Sync {
    async fn save(&self, draft: &Draft) -> Result<(), SaveError>;
}

/// Accepts everything after a fixed delay.
pub struct Simulated {
    latency: Duration,
}

impl Simulated {
    pub fn new(latency: Duration) -> Self {
        Simulated { latency }
    }
}

#[async_trait]
impl AuthBackend for Simulated {
    async fn login(&self, _credentials: &Credentials) -> Result<(), AuthError> {
        tokio::time::sleep(self.latency).await;
        Ok(())
    }

    async fn sign_up(&self, _details: &SignUpDetails) -> Result<(), AuthError> {
        tokio::time::sleep(self.latency).await;
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for Simulated {
    async fn authenticate(&self) -> Result<Identity, AuthError> {
        tokio::time::sleep(self.latency).await;
        Ok(Identity { display_name: None })
    }
}

#[async_trait]
impl EntrySink for Simulated {
    async fn save(&self, _draft: &Draft) -> Result<(), SaveError> {
        tokio::time::sleep(self.latency).await;
        Ok(())
    }
}

#[derive(Clone)]
pub struct Services {
    pub auth: Arc<dyn AuthBackend>,
    pub identity: Arc<dyn IdentityProvider>,
    pub entries: Arc<dyn EntrySink>,
    pub analyzer: Arc<dyn MoodAnalyzer>,
    pub share: Arc<dyn ShareTarget>,
}

impl Services {
    pub fn simulated(config: &Config) -> Self {
        let auth = Arc::new(Simulated::new(config.auth_latency()));
        Services {
            auth: auth.clone(),
            identity: auth,
            entries: Arc::new(Simulated::new(config.save_latency())),
            analyzer: Arc::new(SimulatedAnalyzer::new(config.analysis_latency())),
            share: Arc::new(FileShareTarget::new(config.export_dir.clone())),
        }
    }
}
