use std::{process::ExitCode, sync::Arc};

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{
    error::EMPTY_TAG_MESSAGE, load_settings_with, ActionOutcome, AdviceController, ControllerState,
    HttpAdviceClient,
};
use shared::domain::PlayerTag;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(about = "Look up a player profile and ask the advice service what to do next")]
struct Cli {
    /// Base url of the advice service; overrides advisor.toml and ADVISOR_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show a player's current snapshot.
    Player { tag: String },
    /// Fetch the player, then request advice for them.
    Advice {
        tag: String,
        #[arg(long)]
        war_focus: bool,
    },
    /// List the snapshots the service has stored for a player.
    History { tag: String },
    /// Check that the advice service is up.
    Health,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let settings = load_settings_with(cli.api_url)?;
    let client = Arc::new(HttpAdviceClient::new(&settings)?);
    info!(api_url = %client.base_url(), "using advice service");

    let code = match cli.command {
        Command::Player { tag } => {
            let controller = AdviceController::new(client);
            controller.set_player_tag(tag).await;
            controller.fetch_player().await;
            finish(&controller.snapshot())
        }
        Command::Advice { tag, war_focus } => {
            let controller = AdviceController::new(client);
            controller.set_player_tag(tag).await;
            controller.set_war_focus(war_focus).await;
            if controller.fetch_player().await == ActionOutcome::Applied {
                controller.fetch_advice().await;
            }
            finish(&controller.snapshot())
        }
        Command::History { tag } => {
            let tag = tag.trim();
            if tag.is_empty() {
                eprintln!("error: {EMPTY_TAG_MESSAGE}");
                return Ok(ExitCode::FAILURE);
            }
            match client.player_history(&PlayerTag::new(tag)).await {
                Ok(items) => {
                    print!("{}", render::HistoryView(&items));
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    eprintln!("error: {err}");
                    ExitCode::FAILURE
                }
            }
        }
        Command::Health => match client.health().await {
            Ok(health) => {
                println!("advice service: {}", health.status);
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("error: {err}");
                ExitCode::FAILURE
            }
        },
    };

    Ok(code)
}

fn finish(state: &ControllerState) -> ExitCode {
    if let Some(player) = state.player() {
        print!("{}", render::PlayerView(player));
    }
    if let Some(advice) = state.advice() {
        print!("{}", render::AdviceView(advice));
    }
    match state.error_message() {
        Some(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
        None => ExitCode::SUCCESS,
    }
}
