#![allow(dead_code)]

use std::sync::Arc;

use assetdag::Build;
use assetdag::reload::ReloadSession;
use assetdag_test_utils::RecordingTransport;
use assetdag_test_utils::builders::Project;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wire a build for `project` whose reload session records instead of
/// serving HTTP.
pub fn recorded_build(project: &Project) -> (Build, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::new());
    let session = Arc::new(ReloadSession::new(transport.clone()));
    (Build::with_session(project.config(), session), transport)
}
