use std::time::Duration;

use clap::ArgMatches;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use brewboard_core::panels::LiveTranscription;
use brewboard_core::{ChatMessage, FeedRecord, MessageFeed};

use super::helpers::load_config_with_warning;

/// Upper bound on waiting for the bubble to pick up one local message.
const OBSERVE_TIMEOUT: Duration = Duration::from_secs(1);

/// Push each stdin record into a feed and print what the bubble shows.
pub(crate) async fn handle_transcript_command(
    _matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_with_warning();
    let clear_after = config.transcript.clear_after();

    let feed = MessageFeed::new();
    let mut panel = LiveTranscription::from_config(&config, feed.clone())?;
    panel.on_new_local_message(|message| {
        println!("🎤 {}", message.text);
    });
    panel.set_visible(true);
    let mut shown = panel.subscribe();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pushed = 0usize;
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<FeedRecord>(&line) {
            Ok(record) => {
                let message = ChatMessage::from(record);
                let wait_for_id = message.is_local().then(|| message.id.clone());
                feed.push(message);
                pushed += 1;

                // Wait until the bubble shows this line so consecutive
                // records are not coalesced into the newest one.
                if let Some(id) = wait_for_id {
                    let observed = tokio::time::timeout(
                        OBSERVE_TIMEOUT,
                        shown.wait_for(|line| line.as_ref().is_some_and(|l| l.message_id == id)),
                    )
                    .await;
                    if !matches!(observed, Ok(Ok(_))) {
                        warn!(event = "cli.transcript_line_not_observed", message_id = %id);
                    }
                }
            }
            Err(e) => {
                eprintln!("Skipping malformed feed record: {}", e);
                warn!(event = "cli.transcript_record_invalid", error = %e);
            }
        }
    }

    // Keep the last line up for its full display time
    if panel.view().is_some_and(|view| view.is_listening) {
        tokio::time::sleep(clear_after).await;
    }
    panel.set_visible(false);

    info!(event = "cli.transcript_completed", messages = pushed);
    Ok(())
}
