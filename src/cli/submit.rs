//! Submit and find-build commands

use asc_submit::auth::{ConnectCredentials, TokenSigner};
use asc_submit::connect::{AppStoreConnectClient, ConnectGateway};
use asc_submit::error::Result;
use asc_submit::submit::{SubmissionOutcome, Submitter};
use asc_submit::types::ReleaseNotes;

fn build_client(credentials: &ConnectCredentials) -> Result<AppStoreConnectClient> {
    let signer = TokenSigner::new(credentials)?;
    AppStoreConnectClient::new(signer)
}

/// Run the submit command: locate, promote, and submit one version
pub async fn run_submit(
    credentials: &ConnectCredentials,
    app_id: &str,
    version: &str,
    notes: ReleaseNotes,
) -> Result<()> {
    let client = build_client(credentials)?;
    let submitter = Submitter::new(&client);

    match submitter.submit(app_id, version, &notes).await? {
        SubmissionOutcome::Submitted => {
            println!("Submitted version {version} for review");
        }
        SubmissionOutcome::AlreadySubmitted => {
            println!("Version {version} was already submitted; nothing to do");
        }
    }
    Ok(())
}

/// Run the find-build command: locate the TestFlight build for a version
/// label and print its details
pub async fn run_find_build(
    credentials: &ConnectCredentials,
    app_id: &str,
    version: &str,
) -> Result<()> {
    let client = build_client(credentials)?;
    let submitter = Submitter::new(&client);

    let build_id = submitter.find_build(app_id, version).await?;
    let build = client.get_build(&build_id).await?;

    println!("Build id:         {build_id}");
    println!("Bundle version:   {}", build.bundle_version);
    if let Some(state) = build.processing_state {
        println!("Processing state: {state}");
    }
    if let Some(uploaded) = build.uploaded_date {
        println!("Uploaded:         {uploaded}");
    }
    Ok(())
}
