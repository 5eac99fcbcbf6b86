//! Three-stage submission pipeline
//!
//! Drives the workflow of shipping a TestFlight build to App Store review:
//! 1. Locate - find the uploaded build for the requested version label
//! 2. Promote - attach the build to the App Store version (create if absent)
//! 3. Review - update release notes and file the review submission
//!
//! Each stage fails fast; completed platform-side work is left in place
//! since promotion and build-linking are idempotent and safe to re-run.

mod locate;
mod promote;
mod review;

pub use locate::{find_build, BUILD_PAGE_SIZE};
pub use promote::attach_build;
pub use review::{is_already_submitted_error, submit_for_review, SubmissionOutcome};

use crate::connect::ConnectGateway;
use crate::error::{log_api_failure, Result};
use crate::types::ReleaseNotes;
use tracing::info;

/// Orchestrates the locate → promote → review pipeline against one gateway
pub struct Submitter<'a> {
    gateway: &'a dyn ConnectGateway,
}

impl<'a> Submitter<'a> {
    /// Create a submitter over a gateway
    pub const fn new(gateway: &'a dyn ConnectGateway) -> Self {
        Self { gateway }
    }

    /// Locate the TestFlight build for a version label, standalone
    pub async fn find_build(&self, app_id: &str, version_string: &str) -> Result<String> {
        find_build(self.gateway, app_id, version_string)
            .await
            .inspect_err(log_api_failure)
    }

    /// Run the full pipeline for one (app, version, notes) request.
    ///
    /// Aborts on the first failing stage. No rollback is attempted.
    pub async fn submit(
        &self,
        app_id: &str,
        version_string: &str,
        notes: &ReleaseNotes,
    ) -> Result<SubmissionOutcome> {
        info!(app_id, version_string, "starting submission");

        let build_id = find_build(self.gateway, app_id, version_string)
            .await
            .inspect_err(log_api_failure)?;

        attach_build(self.gateway, app_id, version_string, &build_id)
            .await
            .inspect_err(log_api_failure)?;

        let outcome = submit_for_review(self.gateway, app_id, version_string, notes)
            .await
            .inspect_err(log_api_failure)?;

        info!(app_id, version_string, ?outcome, "submission finished");
        Ok(outcome)
    }
}
