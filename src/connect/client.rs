//! App Store Connect client implementation using reqwest
//!
//! Speaks the JSON:API wire format Connect uses: every resource is a
//! `{type, id, attributes, relationships}` envelope, related resources
//! arrive in a top-level `included` array.

use crate::auth::TokenSigner;
use crate::connect::ConnectGateway;
use crate::error::{Error, Result};
use crate::types::{Build, Localization, ReleaseVersion, ReviewSubmission};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// Production App Store Connect API base URL
const API_BASE_URL: &str = "https://api.appstoreconnect.apple.com/v1";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The one platform this deployment targets
const PLATFORM_IOS: &str = "IOS";

/// App Store Connect service using reqwest
pub struct AppStoreConnectClient {
    client: Client,
    signer: TokenSigner,
    base_url: String,
}

#[derive(Deserialize)]
struct CollectionDocument<T> {
    #[serde(default)]
    data: Vec<T>,
    #[serde(default)]
    included: Vec<IncludedResource>,
}

#[derive(Deserialize)]
struct SingleDocument<T> {
    data: T,
}

#[derive(Deserialize)]
struct IncludedResource {
    #[serde(rename = "type")]
    kind: String,
    id: String,
    #[serde(default)]
    attributes: serde_json::Value,
}

#[derive(Deserialize)]
struct Relationship {
    #[serde(default)]
    data: Option<ResourceId>,
}

#[derive(Deserialize)]
struct ResourceId {
    id: String,
}

#[derive(Deserialize, Default)]
struct BuildResource {
    id: String,
    #[serde(default)]
    attributes: BuildAttributes,
    #[serde(default)]
    relationships: Option<BuildRelationships>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct BuildAttributes {
    /// Bundle version (build number)
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    processing_state: Option<String>,
    #[serde(default)]
    uploaded_date: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildRelationships {
    #[serde(default)]
    pre_release_version: Option<Relationship>,
    #[serde(default)]
    app: Option<Relationship>,
}

#[derive(Deserialize, Default)]
struct VersionResource {
    id: String,
    #[serde(default)]
    attributes: VersionAttributes,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct VersionAttributes {
    #[serde(default)]
    version_string: Option<String>,
    #[serde(default)]
    app_store_state: Option<String>,
}

#[derive(Deserialize, Default)]
struct LocalizationResource {
    id: String,
    #[serde(default)]
    attributes: LocalizationAttributes,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LocalizationAttributes {
    #[serde(default)]
    locale: Option<String>,
    #[serde(default)]
    whats_new: Option<String>,
}

#[derive(Deserialize, Default)]
struct SubmissionResource {
    id: String,
    #[serde(default)]
    attributes: SubmissionAttributes,
}

#[derive(Deserialize, Default)]
struct SubmissionAttributes {
    #[serde(default)]
    submitted: Option<bool>,
}

impl BuildResource {
    fn into_build(self, included: &[IncludedResource]) -> Build {
        let relationships = self.relationships.as_ref();

        let pre_release_version = relationships
            .and_then(|r| r.pre_release_version.as_ref())
            .and_then(|r| r.data.as_ref())
            .and_then(|data| {
                included
                    .iter()
                    .find(|inc| inc.kind == "preReleaseVersions" && inc.id == data.id)
            })
            .and_then(|inc| inc.attributes.get("version"))
            .and_then(|v| v.as_str())
            .map(ToString::to_string);

        let app_id = relationships
            .and_then(|r| r.app.as_ref())
            .and_then(|r| r.data.as_ref())
            .map(|data| data.id.clone());

        Build {
            id: self.id,
            bundle_version: self.attributes.version.unwrap_or_default(),
            processing_state: self.attributes.processing_state,
            uploaded_date: self.attributes.uploaded_date,
            pre_release_version,
            app_id,
        }
    }
}

impl From<VersionResource> for ReleaseVersion {
    fn from(resource: VersionResource) -> Self {
        let raw_state = resource.attributes.app_store_state.unwrap_or_default();
        Self {
            id: resource.id,
            version_string: resource.attributes.version_string.unwrap_or_default(),
            state: crate::types::AppStoreState::parse(&raw_state),
        }
    }
}

impl From<SubmissionResource> for ReviewSubmission {
    fn from(resource: SubmissionResource) -> Self {
        Self {
            id: resource.id,
            submitted: resource.attributes.submitted.unwrap_or(false),
        }
    }
}

impl AppStoreConnectClient {
    /// Create a client against the production API
    pub fn new(signer: TokenSigner) -> Result<Self> {
        Self::with_base_url(signer, API_BASE_URL)
    }

    /// Create a client against an explicit base URL (used by tests)
    pub fn with_base_url(signer: TokenSigner, base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            signer,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self
            .client
            .get(self.api_url(path))
            .bearer_auth(self.signer.bearer()?)
            .query(query)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(self.api_url(path))
            .bearer_auth(self.signer.bearer()?)
            .json(body)
            .send()
            .await?;
        Self::check(response).await
    }

    async fn patch_json(&self, path: &str, body: &serde_json::Value) -> Result<reqwest::Response> {
        let response = self
            .client
            .patch(self.api_url(path))
            .bearer_auth(self.signer.bearer()?)
            .json(body)
            .send()
            .await?;
        Self::check(response).await
    }

    /// Map a non-success response into `ConnectApi`, preserving the body
    /// so callers can classify the structured error document.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(Error::ConnectApi {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl ConnectGateway for AppStoreConnectClient {
    async fn list_builds(&self, app_id: &str, limit: u8) -> Result<Vec<Build>> {
        debug!(app_id, limit, "listing builds");
        let limit = limit.to_string();
        let document: CollectionDocument<BuildResource> = self
            .get_json(
                "/builds",
                &[
                    ("filter[app]", app_id),
                    ("include", "preReleaseVersion"),
                    ("sort", "-uploadedDate"),
                    ("limit", &limit),
                ],
            )
            .await?;

        let CollectionDocument { data, included } = document;
        let builds: Vec<Build> = data
            .into_iter()
            .map(|resource| resource.into_build(&included))
            .collect();
        debug!(app_id, count = builds.len(), "listed builds");
        Ok(builds)
    }

    async fn get_build(&self, build_id: &str) -> Result<Build> {
        debug!(build_id, "fetching build");
        let document: SingleDocument<BuildResource> = self
            .get_json(&format!("/builds/{build_id}"), &[("include", "app")])
            .await?;
        Ok(document.data.into_build(&[]))
    }

    async fn list_release_versions(
        &self,
        app_id: &str,
        version_string: &str,
    ) -> Result<Vec<ReleaseVersion>> {
        debug!(app_id, version_string, "listing App Store versions");
        let document: CollectionDocument<VersionResource> = self
            .get_json(
                &format!("/apps/{app_id}/appStoreVersions"),
                &[("filter[versionString]", version_string)],
            )
            .await?;

        Ok(document.data.into_iter().map(Into::into).collect())
    }

    async fn create_release_version(
        &self,
        app_id: &str,
        version_string: &str,
    ) -> Result<ReleaseVersion> {
        debug!(app_id, version_string, "creating App Store version");
        let body = json!({
            "data": {
                "type": "appStoreVersions",
                "attributes": {
                    "versionString": version_string,
                    "platform": PLATFORM_IOS,
                },
                "relationships": {
                    "app": {
                        "data": { "type": "apps", "id": app_id }
                    }
                }
            }
        });

        let document: SingleDocument<VersionResource> =
            self.post_json("/appStoreVersions", &body).await?.json().await?;
        let version: ReleaseVersion = document.data.into();
        debug!(version_id = %version.id, "created App Store version");
        Ok(version)
    }

    async fn set_release_version_build(&self, version_id: &str, build_id: &str) -> Result<()> {
        debug!(version_id, build_id, "linking build to App Store version");
        let body = json!({
            "data": {
                "type": "appStoreVersions",
                "id": version_id,
                "relationships": {
                    "build": {
                        "data": { "type": "builds", "id": build_id }
                    }
                }
            }
        });

        self.patch_json(&format!("/appStoreVersions/{version_id}"), &body)
            .await?;
        debug!(version_id, "linked build");
        Ok(())
    }

    async fn list_localizations(&self, version_id: &str) -> Result<Vec<Localization>> {
        debug!(version_id, "listing localizations");
        let document: CollectionDocument<LocalizationResource> = self
            .get_json(
                &format!("/appStoreVersions/{version_id}/appStoreVersionLocalizations"),
                &[("fields[appStoreVersionLocalizations]", "locale,whatsNew")],
            )
            .await?;

        let localizations: Vec<Localization> = document
            .data
            .into_iter()
            .map(|resource| Localization {
                id: resource.id,
                locale: resource.attributes.locale.unwrap_or_default(),
                whats_new: resource.attributes.whats_new,
            })
            .collect();
        debug!(
            version_id,
            count = localizations.len(),
            "listed localizations"
        );
        Ok(localizations)
    }

    async fn update_localization(&self, localization_id: &str, whats_new: &str) -> Result<()> {
        debug!(localization_id, "updating localization");
        let body = json!({
            "data": {
                "type": "appStoreVersionLocalizations",
                "id": localization_id,
                "attributes": { "whatsNew": whats_new }
            }
        });

        self.patch_json(
            &format!("/appStoreVersionLocalizations/{localization_id}"),
            &body,
        )
        .await?;
        Ok(())
    }

    async fn create_review_submission(&self, app_id: &str) -> Result<ReviewSubmission> {
        debug!(app_id, "creating review submission");
        let body = json!({
            "data": {
                "type": "reviewSubmissions",
                "attributes": { "platform": PLATFORM_IOS },
                "relationships": {
                    "app": {
                        "data": { "type": "apps", "id": app_id }
                    }
                }
            }
        });

        let document: SingleDocument<SubmissionResource> =
            self.post_json("/reviewSubmissions", &body).await?.json().await?;
        Ok(document.data.into())
    }

    async fn list_review_submissions(&self, app_id: &str) -> Result<Vec<ReviewSubmission>> {
        debug!(app_id, "listing review submissions");
        let document: CollectionDocument<SubmissionResource> = self
            .get_json(
                "/reviewSubmissions",
                &[
                    ("filter[app]", app_id),
                    ("fields[reviewSubmissions]", "appStoreVersionForReview"),
                ],
            )
            .await?;

        Ok(document.data.into_iter().map(Into::into).collect())
    }

    async fn create_review_submission_item(
        &self,
        submission_id: &str,
        version_id: &str,
    ) -> Result<()> {
        debug!(submission_id, version_id, "creating review submission item");
        let body = json!({
            "data": {
                "type": "reviewSubmissionItems",
                "relationships": {
                    "appStoreVersion": {
                        "data": { "type": "appStoreVersions", "id": version_id }
                    },
                    "reviewSubmission": {
                        "data": { "type": "reviewSubmissions", "id": submission_id }
                    }
                }
            }
        });

        self.post_json("/reviewSubmissionItems", &body).await?;
        Ok(())
    }

    async fn complete_review_submission(&self, submission_id: &str) -> Result<()> {
        debug!(submission_id, "finalizing review submission");
        let body = json!({
            "data": {
                "type": "reviewSubmissions",
                "id": submission_id,
                "attributes": { "submitted": true }
            }
        });

        self.patch_json(&format!("/reviewSubmissions/{submission_id}"), &body)
            .await?;
        debug!(submission_id, "review submission finalized");
        Ok(())
    }
}
