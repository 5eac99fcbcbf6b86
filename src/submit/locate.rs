//! Build locator - find the TestFlight build for a version label

use crate::connect::ConnectGateway;
use crate::error::{Error, Result};
use tracing::{debug, info};

/// How many recent builds to scan.
///
/// A bounded window keeps the lookup to a single page; the requested
/// version is expected among the most recent uploads.
pub const BUILD_PAGE_SIZE: u8 = 50;

/// Find the most recent build whose pre-release version label equals
/// `version_string` exactly (string equality, no normalization).
///
/// Returns `BuildNotFound` when the app has no builds at all and
/// `VersionNotFound` when no build in the window matches. The window is
/// never expanded automatically.
pub async fn find_build(
    gateway: &dyn ConnectGateway,
    app_id: &str,
    version_string: &str,
) -> Result<String> {
    info!(app_id, version_string, "searching TestFlight builds");

    let builds = gateway.list_builds(app_id, BUILD_PAGE_SIZE).await?;
    if builds.is_empty() {
        return Err(Error::BuildNotFound(app_id.to_string()));
    }

    let build = builds
        .iter()
        .find(|b| b.pre_release_version.as_deref() == Some(version_string))
        .ok_or_else(|| Error::VersionNotFound(version_string.to_string()))?;

    debug!(
        build_id = %build.id,
        bundle_version = %build.bundle_version,
        processing_state = ?build.processing_state,
        uploaded_date = ?build.uploaded_date,
        "found matching build"
    );
    Ok(build.id.clone())
}
