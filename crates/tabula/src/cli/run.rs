//! The interactive purge session.

use super::prompt::{Prompter, clean_token};
use super::report::{cleanup_summary, purge_summary};
use super::Cli;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use tabula_discord::DiscordClient;
use tabula_purge::{AccountCleanup, ExclusionSet, PurgeContext, PurgeOptionsBuilder, PurgeOrchestrator};
use tabula_rate_limit::TabulaConfig;
use tracing::{debug, warn};

const DELETION_WARNING: &str = "\
WARNING: DESTRUCTIVE ACTION

This will DELETE your messages and reactions across Discord
(except any exclusions you selected):

  - All messages in ALL servers
  - All threads (public and private) and forum posts
  - All direct messages (open AND hidden) and group DMs
  - All reactions you placed on any message

This action CANNOT be undone!
";

const CLEANUP_WARNING: &str = "\
ADDITIONAL CLEANUP OPTION

  - Remove ALL friends from your friend list
  - Leave ALL servers you are a member of

This action CANNOT be undone!
";

/// Run one session: authenticate, choose exclusions, purge, clean up.
///
/// Exits with failure when no token is available or it is rejected, and
/// with success when the user declines the purge.
pub async fn run_session(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    println!("Tabula - deletes ALL your messages everywhere");
    println!();

    let config = match &cli.config {
        Some(path) => TabulaConfig::from_file(path)?,
        None => TabulaConfig::load()?,
    };
    debug!(?config, "Loaded configuration");

    let mut prompter = Prompter::new(io::stdin().lock(), io::stdout());

    let token = match cli.token.as_deref() {
        Some(token) => {
            println!("Using token from DISCORD_TOKEN or --token.");
            println!();
            clean_token(token)
        }
        None => prompter.token()?,
    };
    if token.is_empty() {
        eprintln!("Error: a token is required.");
        return Ok(ExitCode::FAILURE);
    }

    let client = DiscordClient::connect(&token, &config)?;
    println!("Authenticating...");
    let me = match client.current_user().await {
        Ok(me) => me,
        Err(e) => {
            eprintln!("Authentication failed: {}", e);
            if e.is_invalid_credential() {
                eprintln!();
                eprintln!("Troubleshooting:");
                eprintln!("  - Make sure you copied the full token");
                eprintln!("  - Tokens expire, get a fresh one if it is old");
                eprintln!("  - Do not include quotes around the token");
            }
            return Ok(ExitCode::FAILURE);
        }
    };
    println!("Authenticated as: {} (ID: {})", me.tag(), me.id());
    println!();

    let exclusions = choose_exclusions(&client, &mut prompter).await?;

    println!("{}", DELETION_WARNING);
    let confirmed = prompter.confirm(
        "Would you like to delete all public and private messages you have ever sent from this account? (yes/no): ",
    )?;
    if !confirmed {
        println!("Operation cancelled.");
        return Ok(ExitCode::SUCCESS);
    }

    println!();
    println!("Starting message purge... This may take a very long time.");
    println!("You can press Ctrl+C at any time to stop. Already-deleted messages stay deleted.");
    println!();

    let mut options = PurgeOptionsBuilder::default();
    options.exclusions(exclusions);
    if let Some(path) = cli.data_package {
        options.export_path(path);
    }
    let ctx = PurgeContext::new(client, me.id().as_str(), config);
    let stats = PurgeOrchestrator::new(&ctx, options.build()?).run().await;
    println!("{}", purge_summary(&stats));

    println!();
    println!("{}", CLEANUP_WARNING);
    if !prompter.confirm("Remove all friends and leave all servers? (yes/no): ")? {
        println!();
        println!("Cleanup skipped. Friends and servers remain unchanged.");
        return Ok(ExitCode::SUCCESS);
    }

    let cleanup = AccountCleanup::new(&ctx);

    println!();
    println!("Removing friends...");
    let friends_removed = match cleanup.remove_all_friends().await {
        Ok(removed) => {
            println!("Removed {} friends.", removed);
            removed
        }
        Err(e) => {
            eprintln!("Error removing friends: {}", e);
            0
        }
    };

    println!();
    println!("Leaving servers...");
    let servers_left = match cleanup.leave_all_guilds().await {
        Ok(left) => {
            println!("Left {} servers.", left);
            left
        }
        Err(e) => {
            eprintln!("Error leaving servers: {}", e);
            0
        }
    };

    println!();
    println!("{}", cleanup_summary(&stats, friends_removed, servers_left));
    Ok(ExitCode::SUCCESS)
}

/// List servers and open conversations and let the user exclude some.
///
/// When neither list can be loaded the full scope is used.
async fn choose_exclusions<R: BufRead, W: Write>(
    client: &DiscordClient,
    prompter: &mut Prompter<R, W>,
) -> io::Result<ExclusionSet> {
    println!("Loading servers and conversations...");

    let guilds = client.guilds().await;
    if let Err(e) = &guilds {
        warn!(error = %e, "Could not load server list for exclusions");
    }
    let conversations = client.dm_channels().await;
    if let Err(e) = &conversations {
        warn!(error = %e, "Could not load conversation list for exclusions");
    }

    if guilds.is_err() && conversations.is_err() {
        println!("Exclusion selection unavailable; continuing with full deletion scope.");
        println!();
        return Ok(ExclusionSet::new());
    }

    println!();
    prompter.exclusions(
        &guilds.unwrap_or_default(),
        &conversations.unwrap_or_default(),
    )
}
