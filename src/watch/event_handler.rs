// src/watch/event_handler.rs

//! Turns raw filesystem events into binding triggers.

use std::path::Path;

use notify::EventKind;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::engine::RuntimeEvent;
use crate::watch::path_utils::{is_hidden, relative_str};
use crate::watch::patterns::{BindingPatterns, matching_bindings};

/// Whether an event kind can change build inputs. Reads and metadata-less
/// "other" notifications never can.
pub fn is_relevant(kind: &EventKind) -> bool {
    !matches!(kind, EventKind::Access(_) | EventKind::Other)
}

/// Send one `BindingTriggered` per binding whose globs match `path`.
///
/// Returns how many triggers were sent.
pub async fn process_file_change(
    root: &Path,
    path: &Path,
    patterns: &[BindingPatterns],
    runtime_tx: &mpsc::Sender<RuntimeEvent>,
) -> usize {
    let Some(rel) = relative_str(root, path) else {
        warn!(path = %path.display(), root = %root.display(), "event path outside project root");
        return 0;
    };

    if is_hidden(&rel) {
        return 0;
    }

    let matched = matching_bindings(patterns, &rel);
    if matched.is_empty() {
        return 0;
    }
    debug!(rel = %rel, bindings = ?matched, "path matched watch bindings");

    let mut sent = 0;
    for binding in matched {
        let event = RuntimeEvent::BindingTriggered {
            binding: binding.to_string(),
            path: rel.clone().into(),
        };
        if let Err(err) = runtime_tx.send(event).await {
            warn!(binding, error = %err, "failed to send trigger to runtime");
            continue;
        }
        sent += 1;
    }
    sent
}

#[cfg(test)]
mod tests {
    use notify::event::{AccessKind, CreateKind, ModifyKind};

    use super::*;

    #[test]
    fn reads_are_not_relevant() {
        assert!(!is_relevant(&EventKind::Access(AccessKind::Any)));
        assert!(is_relevant(&EventKind::Create(CreateKind::File)));
        assert!(is_relevant(&EventKind::Modify(ModifyKind::Any)));
    }

    #[tokio::test]
    async fn one_trigger_per_matching_binding() {
        let patterns = vec![
            BindingPatterns::compile("styles", &["src/sass/**/*.scss".to_string()]).unwrap(),
            BindingPatterns::compile("copy", &["src/**/*".to_string()]).unwrap(),
        ];
        let (tx, mut rx) = mpsc::channel(8);

        let sent = process_file_change(
            Path::new("/p"),
            Path::new("/p/src/sass/main.scss"),
            &patterns,
            &tx,
        )
        .await;

        assert_eq!(sent, 2);
        let mut names = Vec::new();
        while let Ok(RuntimeEvent::BindingTriggered { binding, path }) = rx.try_recv() {
            assert_eq!(path, Path::new("src/sass/main.scss"));
            names.push(binding);
        }
        assert_eq!(names, ["styles", "copy"]);
    }

    #[tokio::test]
    async fn hidden_files_are_ignored() {
        let patterns =
            vec![BindingPatterns::compile("copy", &["src/copy/**/*".to_string()]).unwrap()];
        let (tx, _rx) = mpsc::channel(8);

        let sent = process_file_change(
            Path::new("/p"),
            Path::new("/p/src/copy/.DS_Store"),
            &patterns,
            &tx,
        )
        .await;
        assert_eq!(sent, 0);
    }
}
