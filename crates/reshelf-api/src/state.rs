//! Shared handler state.

use std::sync::Arc;

use reshelf_acquire::Acquirer;
use reshelf_fsops::FsOpsService;
use reshelf_telemetry::Metrics;

/// Collaborators every handler reaches through `State<Arc<ApiState>>`.
pub struct ApiState {
    pub(crate) fsops: FsOpsService,
    pub(crate) acquirer: Arc<dyn Acquirer>,
    pub(crate) telemetry: Metrics,
}

impl ApiState {
    /// Bundle the filesystem service, the acquisition client and the metrics registry.
    #[must_use]
    pub fn new(fsops: FsOpsService, acquirer: Arc<dyn Acquirer>, telemetry: Metrics) -> Self {
        Self {
            fsops,
            acquirer,
            telemetry,
        }
    }
}
