//! CLI Commands

pub mod company;
pub mod export;
pub mod survey;

use anyhow::{Context, Result};
use backoffice_harness::ApiHarness;
use tracing::debug;

/// Make sure the harness carries a token, logging in with the configured
/// admin credentials when none was given
pub async fn authenticated(mut harness: ApiHarness) -> Result<ApiHarness> {
    if harness.token().is_none() {
        debug!(username = %harness.env().admin_username, "no token given, logging in");
        harness
            .login_admin()
            .await
            .context("admin login failed (set ADMIN_USERNAME/ADMIN_PASSWORD or pass --token)")?;
    }
    Ok(harness)
}
