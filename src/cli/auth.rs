//! Auth command - test credentials and show setup instructions

use asc_submit::auth::{test_connect_auth, ConnectCredentials, TokenSigner};
use asc_submit::error::Result;

/// Run the auth test command
pub async fn run_auth_test(credentials: &ConnectCredentials) -> Result<()> {
    let signer = TokenSigner::new(credentials)?;
    let app_count = test_connect_auth(&signer).await?;

    println!("Authenticated against App Store Connect");
    println!("  Issuer id: {}", credentials.issuer_id);
    println!("  Key id:    {}", credentials.key_id);
    println!("  Apps visible to this key: {app_count}");
    Ok(())
}

/// Run the auth setup command (show instructions)
pub fn run_auth_setup() {
    println!("App Store Connect Authentication Setup");
    println!();
    println!("Step 1: Create an API key");
    println!("  1. Go to: https://appstoreconnect.apple.com/access/integrations/api");
    println!("  2. Click '+' to generate a new key");
    println!("  3. Give it the 'App Manager' role or higher");
    println!("  4. Download the .p8 private key file (one-time download)");
    println!();
    println!("Step 2: Set environment variables");
    println!("  export APP_STORE_CONNECT_ISSUER_ID=<issuer id shown above the key list>");
    println!("  export APP_STORE_CONNECT_KEY_ID=<the key's id>");
    println!("  export APP_STORE_CONNECT_PRIVATE_KEY=<.p8 contents, plain or base64>");
    println!();
    println!("  Alternatively pass --private-key-path /path/to/AuthKey_XXXX.p8");
    println!();
    println!("Verify with: asc-submit auth test");
}
