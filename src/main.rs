//! wa-flow - WhatsApp button-flow toolkit
//!
//! Payload builders, webhook parsing and state routing for a WhatsApp
//! Cloud API sales bot, plus a terminal player for chat-demo scenarios.

mod commands;
mod config;
mod demo;
mod landing;
mod models;
mod tui;
mod whatsapp;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::landing::PriceMode;
use crate::whatsapp::routing::ConversationState;

#[derive(Parser)]
#[command(name = "wa-flow")]
#[command(about = "WhatsApp button-flow toolkit and chat-demo player", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Play chat-demo scenarios in the terminal
    Demo {
        /// JSON file with an array of scenarios (built-in set if omitted)
        #[arg(short, long)]
        scenarios: Option<PathBuf>,

        /// Contact name shown in the chat header
        #[arg(short, long)]
        contact: Option<String>,

        /// Hide the prev/next arrows
        #[arg(long)]
        no_nav: bool,

        /// Hide the scenario dots
        #[arg(long)]
        no_dots: bool,

        /// Hide the scenario title under the phone
        #[arg(long)]
        no_caption: bool,
    },

    /// List scenario titles and message counts
    Scenarios {
        /// JSON file with an array of scenarios (built-in set if omitted)
        #[arg(short, long)]
        scenarios: Option<PathBuf>,
    },

    /// Print a canned outbound message as Cloud API JSON
    Payload {
        /// Which message to build
        #[arg(value_enum)]
        kind: PayloadKind,

        /// Recipient phone number
        #[arg(short, long)]
        to: String,
    },

    /// Parse a webhook notification file into interactions
    Parse {
        /// Webhook JSON body
        file: PathBuf,
    },

    /// Show where a button click leads
    Route {
        /// Button or list row id
        #[arg(short, long)]
        button: String,

        /// Current conversation state
        #[arg(short, long, default_value = "initial")]
        state: ConversationState,
    },

    /// Run webhook files through the sample handler
    Simulate {
        /// Webhook JSON bodies, handled in order against one session store
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Check a webhook subscription handshake
    Verify {
        /// hub.mode
        #[arg(long)]
        mode: String,

        /// hub.verify_token
        #[arg(long)]
        token: String,

        /// hub.challenge
        #[arg(long)]
        challenge: String,
    },

    /// Print the landing page outline and pricing tiers
    Sections {
        /// Only show tiers billed this way
        #[arg(long, value_enum)]
        price_mode: Option<PriceMode>,

        /// Navigate to a section anchor through the navbar menu
        #[arg(long)]
        goto: Option<String>,
    },

    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}

/// Canned messages available to `payload`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PayloadKind {
    Text,
    MainMenu,
    Categories,
    ProductActions,
    ProductList,
    Confirm,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());

    // The demo owns the terminal: its logs go to an in-memory tail shown in
    // the status bar and replayed to stderr on exit.
    let logs = tui::LogTail::new();
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    if matches!(cli.command, Commands::Demo { .. }) {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.with_ansi(false).with_writer(logs.clone()))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.with_writer(std::io::stderr))
            .init();
    }

    match cli.command {
        Commands::Demo {
            scenarios,
            contact,
            no_nav,
            no_dots,
            no_caption,
        } => {
            let result = commands::demo(
                scenarios.as_deref(),
                contact,
                no_nav,
                no_dots,
                no_caption,
                logs.clone(),
            )
            .await;
            for line in logs.take_all() {
                eprintln!("{}", line);
            }
            result?;
        }
        Commands::Scenarios { scenarios } => {
            commands::list_scenarios(scenarios.as_deref())?;
        }
        Commands::Payload { kind, to } => {
            commands::print_payload(kind, &to)?;
        }
        Commands::Parse { file } => {
            commands::parse_file(&file)?;
        }
        Commands::Route { button, state } => {
            commands::route(&button, state);
        }
        Commands::Simulate { files } => {
            tracing::info!("Simulating {} webhook file(s)...", files.len());
            commands::simulate(&files)?;
        }
        Commands::Verify {
            mode,
            token,
            challenge,
        } => {
            commands::verify(&mode, &token, &challenge)?;
        }
        Commands::Sections { price_mode, goto } => {
            commands::sections(price_mode, goto.as_deref())?;
        }
        Commands::Init { force } => {
            commands::init(force)?;
        }
    }

    Ok(())
}
