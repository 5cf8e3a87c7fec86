//! Serve command implementation.

use crate::cli::ServeArgs;
use crate::config::Config;
use crate::error::Result;
use crate::page::load_page;
use crate::relay::Relay;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::info;

/// Execute the serve command: answer stdin messages on stdout until EOF.
pub async fn execute_serve(args: ServeArgs, config: Config, config_path: PathBuf) -> Result<()> {
    let page = args
        .source()
        .map(|source| load_page(&source, &config.extractor.patterns))
        .transpose()?;

    let mut relay = Relay::new(config, config_path, page)?;
    info!("Relay listening on stdin");

    let stdin = BufReader::new(tokio::io::stdin());
    let served = serve_lines(&mut relay, stdin, tokio::io::stdout()).await?;

    info!(messages = served, "Relay input closed");
    Ok(())
}

/// Answer each non-blank line of `reader` with one line on `writer`.
///
/// Returns the number of messages answered.
pub async fn serve_lines<R, W>(relay: &mut Relay, reader: R, mut writer: W) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut served = 0;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = relay.handle_line(&line).await;
        let mut encoded = serde_json::to_vec(&response)?;
        encoded.push(b'\n');
        writer.write_all(&encoded).await?;
        writer.flush().await?;
        served += 1;
    }

    Ok(served)
}
