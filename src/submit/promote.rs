//! Version promoter - attach a build to an App Store version

use crate::connect::ConnectGateway;
use crate::error::Result;
use tracing::{debug, info};

/// Ensure an App Store version exists for (app, version string) and link
/// the given build to it.
///
/// Reuses an existing version when one matches the version string exactly;
/// otherwise creates one. This is the only stage of the pipeline that
/// creates platform records. Returns the version id.
pub async fn attach_build(
    gateway: &dyn ConnectGateway,
    app_id: &str,
    version_string: &str,
    build_id: &str,
) -> Result<String> {
    let existing = gateway
        .list_release_versions(app_id, version_string)
        .await?;

    let version_id = match existing.into_iter().next() {
        Some(version) => {
            debug!(version_id = %version.id, "reusing existing App Store version");
            version.id
        }
        None => {
            let version = gateway
                .create_release_version(app_id, version_string)
                .await?;
            info!(version_id = %version.id, version_string, "created App Store version");
            version.id
        }
    };

    gateway
        .set_release_version_build(&version_id, build_id)
        .await?;
    info!(version_id = %version_id, build_id, "linked build to App Store version");
    Ok(version_id)
}
