//! Review state machine - decide and drive the review submission
//!
//! Interprets the version's `appStoreState`, updates release notes when the
//! version is still being prepared, then files the review submission with
//! idempotent handling of "already submitted" races.

use crate::connect::ConnectGateway;
use crate::error::{Error, Result};
use crate::types::{AppStoreState, ReleaseNotes, ReleaseVersion};
use tracing::{debug, info, warn};

/// Substring Connect puts in the 403 error detail once a version is already
/// part of a submitted review
const CREATE_DISALLOWED_DETAIL: &str = "does not allow 'CREATE'. Allowed operation is: DELETE";

/// What the review flow ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// A review submission was filed during this run
    Submitted,
    /// The version was already submitted; nothing was changed
    AlreadySubmitted,
}

/// Submit a version for review.
///
/// Resolves the version for (app, version string), classifies its state,
/// updates localizations when the version is still in preparation, and
/// files the review submission. Already-submitted states short-circuit to
/// success without any mutation; unknown states are a hard failure.
pub async fn submit_for_review(
    gateway: &dyn ConnectGateway,
    app_id: &str,
    version_string: &str,
    notes: &ReleaseNotes,
) -> Result<SubmissionOutcome> {
    let version = resolve_version(gateway, app_id, version_string).await?;
    debug!(version_id = %version.id, state = %version.state, "classifying version state");

    if version.state.is_already_submitted() {
        info!(
            version_string,
            state = %version.state,
            "version already submitted; nothing to do"
        );
        return Ok(SubmissionOutcome::AlreadySubmitted);
    }
    if !version.state.is_submittable() {
        return Err(Error::InvalidVersionState {
            version: version_string.to_string(),
            state: version.state.to_string(),
        });
    }

    // READY_FOR_REVIEW means the version content is final; only a version
    // still in preparation gets its release notes replaced.
    if version.state == AppStoreState::PrepareForSubmission {
        update_release_notes(gateway, &version.id, notes).await?;
    }

    create_submission_request(gateway, app_id, &version.id, version_string).await
}

async fn resolve_version(
    gateway: &dyn ConnectGateway,
    app_id: &str,
    version_string: &str,
) -> Result<ReleaseVersion> {
    let versions = gateway
        .list_release_versions(app_id, version_string)
        .await?;
    versions
        .into_iter()
        .next()
        .ok_or_else(|| Error::VersionNotFound(version_string.to_string()))
}

/// Replace the "What's New" text of every localization attached to the
/// version, mapping each localization's own locale to the supplied notes.
/// No locale is skipped.
async fn update_release_notes(
    gateway: &dyn ConnectGateway,
    version_id: &str,
    notes: &ReleaseNotes,
) -> Result<()> {
    let localizations = gateway.list_localizations(version_id).await?;

    for localization in &localizations {
        let whats_new = notes.for_tag(&localization.locale);
        debug!(
            localization_id = %localization.id,
            locale = %localization.locale,
            "updating release notes"
        );
        gateway
            .update_localization(&localization.id, whats_new)
            .await?;
    }

    info!(
        version_id,
        count = localizations.len(),
        "release notes updated"
    );
    Ok(())
}

/// File the review submission: create (best-effort), look up, add the
/// version, finalize.
///
/// Connect offers no clean way to ask whether a submission already exists,
/// so the create is attempted unconditionally and a failure is assumed to
/// mean "one already exists". The assumption is logged so an unrelated
/// create failure is still visible in the breadcrumbs.
async fn create_submission_request(
    gateway: &dyn ConnectGateway,
    app_id: &str,
    version_id: &str,
    version_string: &str,
) -> Result<SubmissionOutcome> {
    info!(app_id, version_string, "filing review submission");

    if let Err(err) = gateway.create_review_submission(app_id).await {
        warn!(
            error = %err,
            "review submission create failed; assuming one already exists"
        );
    }

    let submissions = gateway.list_review_submissions(app_id).await?;
    let submission = submissions
        .into_iter()
        .next()
        .ok_or_else(|| Error::ReviewSubmissionNotFound(app_id.to_string()))?;
    debug!(submission_id = %submission.id, "using review submission");

    let finalize = async {
        gateway
            .create_review_submission_item(&submission.id, version_id)
            .await?;
        gateway.complete_review_submission(&submission.id).await
    };

    match finalize.await {
        Ok(()) => {
            info!(version_string, "version submitted for review");
            Ok(SubmissionOutcome::Submitted)
        }
        Err(err) if is_already_submitted_error(&err) => {
            info!(version_string, "version was already submitted for review");
            Ok(SubmissionOutcome::AlreadySubmitted)
        }
        Err(err) => Err(err),
    }
}

/// Whether an API failure means the version is already part of a submitted
/// review.
///
/// Connect signals this as a 403 whose first error detail says CREATE is
/// disallowed and only DELETE is permitted. The match is on the structured
/// error document so alternate error shapes can be exercised in tests.
pub fn is_already_submitted_error(err: &Error) -> bool {
    let Error::ConnectApi { status: 403, .. } = err else {
        return false;
    };

    err.api_errors()
        .and_then(|doc| doc.errors.into_iter().next())
        .and_then(|detail| detail.detail)
        .is_some_and(|detail| detail.contains(CREATE_DISALLOWED_DETAIL))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status: u16, detail: &str) -> Error {
        Error::ConnectApi {
            status,
            body: format!(r#"{{"errors":[{{"detail":"{detail}"}}]}}"#),
        }
    }

    #[test]
    fn recognizes_create_disallowed_403() {
        let err = api_error(
            403,
            "The request cannot be fulfilled because of the state of another resource; \
             resource 'reviewSubmissions' does not allow 'CREATE'. Allowed operation is: DELETE",
        );
        assert!(is_already_submitted_error(&err));
    }

    #[test]
    fn ignores_other_403_details() {
        let err = api_error(403, "You do not have permission to perform this request");
        assert!(!is_already_submitted_error(&err));
    }

    #[test]
    fn ignores_non_403_statuses() {
        let err = api_error(
            409,
            "resource does not allow 'CREATE'. Allowed operation is: DELETE",
        );
        assert!(!is_already_submitted_error(&err));
    }

    #[test]
    fn ignores_unparseable_bodies() {
        let err = Error::ConnectApi {
            status: 403,
            body: "forbidden".to_string(),
        };
        assert!(!is_already_submitted_error(&err));
    }

    #[test]
    fn ignores_non_api_errors() {
        assert!(!is_already_submitted_error(&Error::VersionNotFound(
            "1.0".to_string()
        )));
    }
}
