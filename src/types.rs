//! Domain types shared across the submission pipeline

use chrono::{DateTime, Utc};
use std::fmt;

/// A build uploaded to TestFlight
///
/// Platform-owned; read-only to this crate.
#[derive(Debug, Clone)]
pub struct Build {
    /// Build resource id
    pub id: String,
    /// Bundle version (build number)
    pub bundle_version: String,
    /// Processing state reported by TestFlight (e.g. "VALID")
    pub processing_state: Option<String>,
    /// When the build was uploaded
    pub uploaded_date: Option<DateTime<Utc>>,
    /// Version label of the linked pre-release version, the human-facing
    /// version string testers see
    pub pre_release_version: Option<String>,
    /// Owning app id, present when the app relationship was included
    pub app_id: Option<String>,
}

/// An App Store version record going through review
#[derive(Debug, Clone)]
pub struct ReleaseVersion {
    /// Version resource id
    pub id: String,
    /// Public version string (e.g. "2.0.1303")
    pub version_string: String,
    /// Current lifecycle state
    pub state: AppStoreState,
}

/// Per-locale release-notes record attached to a version
#[derive(Debug, Clone)]
pub struct Localization {
    /// Localization resource id
    pub id: String,
    /// Locale tag (e.g. "ja-JP", "en-US", "zh-Hant")
    pub locale: String,
    /// Current "What's New" text
    pub whats_new: Option<String>,
}

/// A review submission batching versions for human review
#[derive(Debug, Clone)]
pub struct ReviewSubmission {
    /// Submission resource id
    pub id: String,
    /// Whether the submission has been finalized
    pub submitted: bool,
}

/// Lifecycle state of an App Store version (`appStoreState`)
///
/// The known values form a closed set for submission purposes; anything
/// else is carried in `Other` and treated as a hard failure by the review
/// flow. States only move forward; this crate never forces one backward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppStoreState {
    /// Version exists but has not been filled in for review
    PrepareForSubmission,
    /// Version is complete and can be submitted directly
    ReadyForReview,
    /// Submitted, waiting in the review queue
    WaitingForReview,
    /// Under active review
    InReview,
    /// Approved, waiting for the developer to release
    PendingDeveloperRelease,
    /// Approved, waiting for Apple to release
    PendingAppleRelease,
    /// Any state outside the known enumeration
    Other(String),
}

impl AppStoreState {
    /// Parse a raw `appStoreState` value
    pub fn parse(raw: &str) -> Self {
        match raw {
            "PREPARE_FOR_SUBMISSION" => Self::PrepareForSubmission,
            "READY_FOR_REVIEW" => Self::ReadyForReview,
            "WAITING_FOR_REVIEW" => Self::WaitingForReview,
            "IN_REVIEW" => Self::InReview,
            "PENDING_DEVELOPER_RELEASE" => Self::PendingDeveloperRelease,
            "PENDING_APPLE_RELEASE" => Self::PendingAppleRelease,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether a review submission can be started from this state
    pub const fn is_submittable(&self) -> bool {
        matches!(self, Self::PrepareForSubmission | Self::ReadyForReview)
    }

    /// Whether the version has already left the pre-submission phase
    /// (queued, under review, or pending release)
    pub const fn is_already_submitted(&self) -> bool {
        matches!(
            self,
            Self::WaitingForReview
                | Self::InReview
                | Self::PendingDeveloperRelease
                | Self::PendingAppleRelease
        )
    }
}

impl fmt::Display for AppStoreState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::PrepareForSubmission => "PREPARE_FOR_SUBMISSION",
            Self::ReadyForReview => "READY_FOR_REVIEW",
            Self::WaitingForReview => "WAITING_FOR_REVIEW",
            Self::InReview => "IN_REVIEW",
            Self::PendingDeveloperRelease => "PENDING_DEVELOPER_RELEASE",
            Self::PendingAppleRelease => "PENDING_APPLE_RELEASE",
            Self::Other(other) => other,
        };
        f.write_str(s)
    }
}

/// The fixed set of release-note languages we maintain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotesLocale {
    /// Japanese
    Ja,
    /// English
    En,
    /// Chinese (both scripts)
    Zh,
}

impl NotesLocale {
    /// Map a platform locale tag to a supported release-note language.
    ///
    /// Prefix match against "ja", "en", "zh" in that priority order;
    /// anything else falls back to English. Total function, no error path.
    pub fn from_tag(tag: &str) -> Self {
        if tag.starts_with("ja") {
            Self::Ja
        } else if tag.starts_with("en") {
            Self::En
        } else if tag.starts_with("zh") {
            Self::Zh
        } else {
            Self::En
        }
    }
}

/// Release-notes text per supported language
#[derive(Debug, Clone)]
pub struct ReleaseNotes {
    /// Japanese "What's New" text
    pub ja: String,
    /// English "What's New" text
    pub en: String,
    /// Chinese "What's New" text
    pub zh: String,
}

impl ReleaseNotes {
    /// Release-notes text for a platform locale tag
    pub fn for_tag(&self, tag: &str) -> &str {
        match NotesLocale::from_tag(tag) {
            NotesLocale::Ja => &self.ja,
            NotesLocale::En => &self.en,
            NotesLocale::Zh => &self.zh,
        }
    }
}
