use anyhow::Result;
use colored::Colorize;
use ragwidget_core::identity::decode_role_claim;

use crate::context::{self, GlobalArgs};

pub fn whoami(args: &GlobalArgs) -> Result<()> {
    let (settings, config) = context::widget_config(args)?;
    let role = config.identity.resolve_role();
    println!("{}", role.to_string().bright_magenta().bold());
    println!("{}", format!("Backend: {}", settings.api_base_url).bright_black());
    Ok(())
}

pub fn login(token: &str) -> Result<()> {
    let store = context::credential_store()?;
    store.save_token(token)?;

    match decode_role_claim(token.trim()) {
        Ok(role) => println!("{}", format!("Logged in as {}.", role).green()),
        Err(e) => {
            tracing::warn!("[Identity] Stored token has no readable role claim: {}", e);
            println!(
                "{}",
                "Token stored, but its role claim is unreadable; you will act as user.".yellow()
            );
        }
    }
    Ok(())
}

pub fn logout(args: &GlobalArgs) -> Result<()> {
    let orchestrator = context::build(args)?;
    let redirect = orchestrator.logout()?;
    tracing::debug!("[Identity] Logout redirect: {}", redirect);
    println!("{}", "Logged out.".green());
    Ok(())
}
