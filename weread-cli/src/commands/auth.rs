//! Auth command implementation

use super::print_json;
use anyhow::Result;
use weread_core::WereadTools;

/// Probe the configured cookie. An invalid session is reported, not an error.
pub async fn auth(tools: &WereadTools, json: bool) -> Result<()> {
    let status = tools.authenticate(None).await;

    if json {
        return print_json(&status);
    }

    if status.valid {
        println!("Session is valid");
    } else {
        println!(
            "Session is not valid: {}",
            status.reason.as_deref().unwrap_or("unknown reason")
        );
    }
    Ok(())
}
