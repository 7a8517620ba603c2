// src/reload/mod.rs

//! Live-reload session.
//!
//! There is exactly one [`ReloadSession`] per process. It starts out
//! uninitialized, becomes active the first time [`ReloadSession::start`]
//! succeeds, and stays active for the lifetime of the watch process.
//! [`ReloadSession::notify`] is a no-op until then, so tasks may call it
//! unconditionally.
//!
//! The transport that actually talks to browsers sits behind
//! [`ReloadTransport`]; [`server::LiveReloadServer`] is the production one.

pub mod server;

use std::fmt::Debug;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use tracing::{debug, info};

pub use server::LiveReloadServer;

/// Browser-facing side of live reload.
pub trait ReloadTransport: Send + Sync + Debug {
    /// Begin serving `root`. Called at most once per process.
    fn start(&self, root: &Path) -> Result<()>;

    /// Ask every connected browser to reload.
    fn notify(&self);
}

/// Lifecycle of the reload session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Active,
}

#[derive(Debug)]
pub struct ReloadSession {
    transport: Arc<dyn ReloadTransport>,
    state: Mutex<SessionState>,
}

impl ReloadSession {
    pub fn new(transport: Arc<dyn ReloadTransport>) -> Self {
        Self {
            transport,
            state: Mutex::new(SessionState::Uninitialized),
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start the transport on `root`; later calls are no-ops.
    pub fn start(&self, root: &Path) -> Result<()> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state == SessionState::Active {
            debug!("reload session already active");
            return Ok(());
        }

        self.transport.start(root)?;
        *state = SessionState::Active;
        info!(root = %root.display(), "reload session started");
        Ok(())
    }

    /// Signal a reload. Returns whether the signal reached the transport.
    pub fn notify(&self) -> bool {
        if self.state() != SessionState::Active {
            debug!("reload requested before the session started; ignoring");
            return false;
        }
        self.transport.notify();
        debug!("reload notification sent");
        true
    }
}
