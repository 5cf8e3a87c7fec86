//! Auth command implementation.

use crate::cli::AuthArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use rolodex_sheets::{authorization_url, token_from_redirect};
use std::path::Path;

/// Execute the auth command.
///
/// Without `--redirect` this prints the consent URL; with it, the token in
/// the redirect URL is stored in the configuration file.
pub async fn execute_auth(
    args: AuthArgs,
    config: &mut Config,
    config_path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    let Some(redirect) = args.redirect else {
        let url = authorization_url(&config.google.client_id, &config.google.redirect_uri)?;
        println!("{}", formatter.info("Open this URL and approve access:"));
        println!("{}", url);
        println!(
            "{}",
            formatter.info("Then run: rolodex auth --redirect '<the URL you were sent to>'")
        );
        return Ok(());
    };

    let token = token_from_redirect(&redirect)?;
    config.google.access_token = Some(token);
    config.save_to(config_path)?;
    println!("{}", formatter.success("Authenticated with Google"));
    Ok(())
}
