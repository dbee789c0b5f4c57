use anyhow::Result;
use gerrit_review_client::auth::validate_auth;
use gerrit_review_core::config::Config;

/// Validate credentials against `/a/accounts/self` and print who we are.
pub fn run(config: &Config) -> Result<()> {
    let client = super::connect(config, false)?;
    let account = validate_auth(&client)?;
    println!(
        "Authenticated to {} as {}",
        client.base_url(),
        account.display_name()
    );
    if let Some(id) = account.account_id {
        println!("  account id: {}", id);
    }
    if let Some(email) = &account.email {
        println!("  email:      {}", email);
    }
    Ok(())
}
