//! App Store Connect gateway
//!
//! Provides a single interface over the Connect resources the submission
//! pipeline touches (builds, versions, localizations, review submissions),
//! injected once so the pipeline can run against a fake in tests.

mod client;

pub use client::AppStoreConnectClient;

use crate::error::Result;
use crate::types::{Build, Localization, ReleaseVersion, ReviewSubmission};
use async_trait::async_trait;

/// Gateway trait over App Store Connect resource operations
///
/// One method per operation the pipeline performs. All calls are
/// sequential; implementations need no internal synchronization beyond
/// `Send + Sync`.
#[async_trait]
pub trait ConnectGateway: Send + Sync {
    /// List an app's builds, most recently uploaded first, with the
    /// pre-release version relationship resolved. `limit` bounds the page.
    async fn list_builds(&self, app_id: &str, limit: u8) -> Result<Vec<Build>>;

    /// Fetch a single build with its app relationship
    async fn get_build(&self, build_id: &str) -> Result<Build>;

    /// List an app's App Store versions filtered by exact version string
    async fn list_release_versions(
        &self,
        app_id: &str,
        version_string: &str,
    ) -> Result<Vec<ReleaseVersion>>;

    /// Create a new App Store version for the app (platform fixed to iOS)
    async fn create_release_version(
        &self,
        app_id: &str,
        version_string: &str,
    ) -> Result<ReleaseVersion>;

    /// Point a version's build relationship at the given build
    async fn set_release_version_build(&self, version_id: &str, build_id: &str) -> Result<()>;

    /// List the localizations attached to a version (locale + whatsNew)
    async fn list_localizations(&self, version_id: &str) -> Result<Vec<Localization>>;

    /// Replace a localization's "What's New" text
    async fn update_localization(&self, localization_id: &str, whats_new: &str) -> Result<()>;

    /// Create a review submission for the app
    async fn create_review_submission(&self, app_id: &str) -> Result<ReviewSubmission>;

    /// List the app's review submissions
    async fn list_review_submissions(&self, app_id: &str) -> Result<Vec<ReviewSubmission>>;

    /// Add a version to a review submission
    async fn create_review_submission_item(
        &self,
        submission_id: &str,
        version_id: &str,
    ) -> Result<()>;

    /// Finalize a review submission by setting `submitted = true`
    async fn complete_review_submission(&self, submission_id: &str) -> Result<()>;
}
