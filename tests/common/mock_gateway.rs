//! Recording fake gateway for pipeline tests

use asc_submit::connect::ConnectGateway;
use asc_submit::error::{Error, Result};
use asc_submit::types::{Build, Localization, ReleaseVersion, ReviewSubmission};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-memory `ConnectGateway` that records every call it receives.
///
/// Calls are recorded as readable strings so tests can assert the exact
/// sequence of operations the pipeline performed.
#[derive(Default)]
pub struct MockGateway {
    /// Builds returned by `list_builds` (already newest-first)
    pub builds: Vec<Build>,
    /// App Store versions; `create_release_version` appends here
    pub versions: Mutex<Vec<ReleaseVersion>>,
    /// Localizations returned for any version
    pub localizations: Vec<Localization>,
    /// Review submissions; `create_review_submission` appends here
    pub submissions: Mutex<Vec<ReviewSubmission>>,
    /// Make `create_review_submission` fail (simulates "already exists")
    pub fail_create_submission: AtomicBool,
    /// One-shot error for `create_review_submission_item`
    pub item_create_error: Mutex<Option<Error>>,
    /// One-shot error for `complete_review_submission`
    pub complete_error: Mutex<Option<Error>>,
    next_version: AtomicUsize,
    next_submission: AtomicUsize,
    calls: Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ConnectGateway for MockGateway {
    async fn list_builds(&self, app_id: &str, _limit: u8) -> Result<Vec<Build>> {
        self.record(format!("list-builds {app_id}"));
        Ok(self.builds.clone())
    }

    async fn get_build(&self, build_id: &str) -> Result<Build> {
        self.record(format!("get-build {build_id}"));
        self.builds
            .iter()
            .find(|b| b.id == build_id)
            .cloned()
            .ok_or_else(|| Error::Internal(format!("no such build {build_id}")))
    }

    async fn list_release_versions(
        &self,
        _app_id: &str,
        version_string: &str,
    ) -> Result<Vec<ReleaseVersion>> {
        self.record(format!("list-versions {version_string}"));
        Ok(self
            .versions
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.version_string == version_string)
            .cloned()
            .collect())
    }

    async fn create_release_version(
        &self,
        _app_id: &str,
        version_string: &str,
    ) -> Result<ReleaseVersion> {
        self.record(format!("create-version {version_string}"));
        let id = format!("V{}", self.next_version.fetch_add(1, Ordering::SeqCst) + 1);
        let version = ReleaseVersion {
            id,
            version_string: version_string.to_string(),
            state: asc_submit::types::AppStoreState::PrepareForSubmission,
        };
        self.versions.lock().unwrap().push(version.clone());
        Ok(version)
    }

    async fn set_release_version_build(&self, version_id: &str, build_id: &str) -> Result<()> {
        self.record(format!("update-version-build {version_id} {build_id}"));
        Ok(())
    }

    async fn list_localizations(&self, version_id: &str) -> Result<Vec<Localization>> {
        self.record(format!("get-localizations {version_id}"));
        Ok(self.localizations.clone())
    }

    async fn update_localization(&self, localization_id: &str, whats_new: &str) -> Result<()> {
        self.record(format!("update-localization {localization_id} {whats_new}"));
        Ok(())
    }

    async fn create_review_submission(&self, app_id: &str) -> Result<ReviewSubmission> {
        self.record(format!("create-submission {app_id}"));
        if self.fail_create_submission.load(Ordering::SeqCst) {
            return Err(Error::ConnectApi {
                status: 409,
                body: r#"{"errors":[{"detail":"There is another reviewSubmission in progress"}]}"#
                    .to_string(),
            });
        }
        let id = format!(
            "S{}",
            self.next_submission.fetch_add(1, Ordering::SeqCst) + 1
        );
        let submission = ReviewSubmission {
            id,
            submitted: false,
        };
        self.submissions.lock().unwrap().push(submission.clone());
        Ok(submission)
    }

    async fn list_review_submissions(&self, app_id: &str) -> Result<Vec<ReviewSubmission>> {
        self.record(format!("list-submissions {app_id}"));
        Ok(self.submissions.lock().unwrap().clone())
    }

    async fn create_review_submission_item(
        &self,
        submission_id: &str,
        version_id: &str,
    ) -> Result<()> {
        self.record(format!("create-submission-item {submission_id} {version_id}"));
        if let Some(err) = self.item_create_error.lock().unwrap().take() {
            return Err(err);
        }
        Ok(())
    }

    async fn complete_review_submission(&self, submission_id: &str) -> Result<()> {
        self.record(format!("update-submission {submission_id}"));
        if let Some(err) = self.complete_error.lock().unwrap().take() {
            return Err(err);
        }
        if let Some(submission) = self
            .submissions
            .lock()
            .unwrap()
            .iter_mut()
            .find(|s| s.id == submission_id)
        {
            submission.submitted = true;
        }
        Ok(())
    }
}
