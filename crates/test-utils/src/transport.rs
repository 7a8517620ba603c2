use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use assetdag::reload::ReloadTransport;

/// Reload transport that records calls instead of serving HTTP.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    starts: Mutex<Vec<PathBuf>>,
    notifies: AtomicUsize,
    fail_start: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose `start` always fails (e.g. port in use).
    pub fn failing() -> Self {
        Self {
            fail_start: true,
            ..Self::default()
        }
    }

    pub fn starts(&self) -> Vec<PathBuf> {
        self.starts.lock().unwrap().clone()
    }

    pub fn notifies(&self) -> usize {
        self.notifies.load(Ordering::SeqCst)
    }
}

impl ReloadTransport for RecordingTransport {
    fn start(&self, root: &Path) -> anyhow::Result<()> {
        if self.fail_start {
            anyhow::bail!("address already in use");
        }
        self.starts.lock().unwrap().push(root.to_path_buf());
        Ok(())
    }

    fn notify(&self) {
        self.notifies.fetch_add(1, Ordering::SeqCst);
    }
}
