//! MTG Table - Main Binary
//!
//! Runs the session/relay server, or imports a deck list from the command line

use anyhow::Context;
use clap::{Parser, Subcommand};
use mtg_table::{
    config::{CardSourceMode, ServerConfig},
    loader::DeckImporter,
    server,
};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::net::IpAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mtg-table")]
#[command(about = "MTG Table - multiplayer card table relay server", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP + WebSocket server
    Serve {
        /// Address to bind
        #[arg(long, env = "MTG_TABLE_BIND", default_value = "0.0.0.0")]
        bind: IpAddr,

        /// Port to listen on
        #[arg(long, env = "PORT", default_value_t = 3000)]
        port: u16,

        /// Browser origin allowed to call the API
        #[arg(long, env = "MTG_TABLE_ALLOWED_ORIGIN", default_value = "http://localhost:5173")]
        allowed_origin: String,

        /// Life total new players start with
        #[arg(long, env = "MTG_TABLE_STARTING_LIFE", default_value_t = 40, allow_negative_numbers = true)]
        starting_life: i32,

        #[command(flatten)]
        cards: CardArgs,
    },

    /// Resolve a deck list file and print the resulting deck as JSON
    Import {
        /// Deck list file, one card per line
        #[arg(value_name = "DECK_FILE")]
        deck: PathBuf,

        #[command(flatten)]
        cards: CardArgs,
    },
}

#[derive(clap::Args)]
struct CardArgs {
    /// Where card names are resolved
    #[arg(long, env = "MTG_TABLE_CARD_SOURCE", value_enum, default_value_t = CardSourceMode::Offline)]
    card_source: CardSourceMode,

    /// JSON card file (for --card-source file)
    #[arg(long, env = "MTG_TABLE_CARD_FILE")]
    card_file: Option<PathBuf>,

    /// Seed for deck shuffles
    #[arg(long, env = "MTG_TABLE_SEED")]
    seed: Option<u64>,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,tower_http=info".into());
    // stdout is reserved for command output
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Commands::Serve {
            bind,
            port,
            allowed_origin,
            starting_life,
            cards,
        } => {
            let config = ServerConfig {
                bind,
                port,
                allowed_origin,
                starting_life,
                card_source: cards.card_source,
                card_file: cards.card_file,
                seed: cards.seed,
            };
            server::serve(config).await.context("server failed")?;
        }
        Commands::Import { deck, cards } => run_import(deck, cards).await?,
    }

    Ok(())
}

async fn run_import(path: PathBuf, cards: CardArgs) -> anyhow::Result<()> {
    let config = ServerConfig {
        card_source: cards.card_source,
        card_file: cards.card_file,
        seed: cards.seed,
        ..ServerConfig::default()
    };
    let source = config.card_source().await.context("loading card source")?;
    let text = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;

    let mut rng = match config.seed {
        Some(seed) => ChaCha12Rng::seed_from_u64(seed),
        None => ChaCha12Rng::from_entropy(),
    };
    let import = DeckImporter::new(&source).resolve(&text).await?.build(&mut rng);
    for warning in import.warnings() {
        tracing::warn!("{warning}");
    }
    println!("{}", serde_json::to_string_pretty(&import.into_deck())?);
    Ok(())
}
