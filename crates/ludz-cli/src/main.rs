//! `ludz`: command-line client for a Ludz server.
//!
//! # Usage
//!
//! ```text
//! ludz --url http://localhost:8080 participants add Max Wolf
//! ludz participants import crew.txt --delimiter ';'
//! ludz forfeit Wolf --tier 3
//! ludz leaderboard
//! ```

mod client;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "ludz", about = "Command-line client for the Ludz stag-night server")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the ludz server (default: http://localhost:8080).
  #[arg(long, env = "LUDZ_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Manage the roster.
  #[command(subcommand)]
  Participants(ParticipantsCmd),
  /// Manage the venues of the crawl.
  #[command(subcommand)]
  Pubs(PubsCmd),
  /// House rules for a pub.
  #[command(subcommand)]
  Rules(RulesCmd),
  /// Draw a challenge and record it.
  Challenge {
    /// Codename or id; a random participant when omitted.
    who:   Option<String>,
    /// Pub name or id.
    #[arg(long = "pub")]
    venue: Option<String>,
  },
  /// Draw a forfeit of the given tier and record it.
  Forfeit {
    /// Codename or id.
    who:   String,
    /// 1, 2, 3 or tier1..tier3.
    #[arg(short, long)]
    tier:  String,
    /// Pub name or id.
    #[arg(long = "pub")]
    venue: Option<String>,
  },
  /// Score and recorded events for one participant.
  History {
    /// Codename or id.
    who: String,
  },
  /// Everyone, highest score first.
  Leaderboard,
}

#[derive(Subcommand, Debug)]
enum ParticipantsCmd {
  Add { name: String, codename: String },
  /// Register one `name<delimiter>codename` per line from a file (`-` for stdin).
  Import {
    file: PathBuf,
    #[arg(short, long)]
    delimiter: Option<char>,
  },
  List,
}

#[derive(Subcommand, Debug)]
enum PubsCmd {
  Add { name: String },
  List,
}

#[derive(Subcommand, Debug)]
enum RulesCmd {
  /// Rules for one pub, or every pub with its rules when omitted.
  List { venue: Option<String> },
  Add { venue: String, text: String },
  /// Draw a rule from the catalog and attach it.
  Roll { venue: String },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:8080".to_string()),
  };
  tracing::debug!(url = %api_config.base_url, "using server");

  let client = ApiClient::new(api_config)?;
  run(&client, args.command).await
}

async fn run(client: &ApiClient, command: Command) -> Result<()> {
  match command {
    Command::Participants(cmd) => participants(client, cmd).await,
    Command::Pubs(PubsCmd::Add { name }) => {
      let venue = client.add_pub(&name).await?;
      println!("Added {} ({})", venue.name, venue.pub_id);
      Ok(())
    }
    Command::Pubs(PubsCmd::List) => {
      for venue in client.list_pubs().await? {
        println!("{}  {}", venue.pub_id, venue.name);
      }
      Ok(())
    }
    Command::Rules(cmd) => rules(client, cmd).await,
    Command::Challenge { who, venue } => {
      let participant_id = match who {
        Some(key) => Some(output::find_participant(&client.list_participants().await?, &key)?),
        None => None,
      };
      let pub_id = resolve_pub(client, venue.as_deref()).await?;
      let roll = client.roll_challenge(participant_id, pub_id).await?;
      println!("{}: {}", roll.codename, roll.event.description);
      Ok(())
    }
    Command::Forfeit { who, tier, venue } => {
      let participant_id = output::find_participant(&client.list_participants().await?, &who)?;
      let pub_id = resolve_pub(client, venue.as_deref()).await?;
      let roll = client.roll_forfeit(participant_id, &tier, pub_id).await?;
      match roll.title {
        Some(title) => println!("{} [{}] {title}", roll.codename, tier_of(&roll.event)),
        None => println!("{}", roll.codename),
      }
      println!("  {}", roll.event.description);
      Ok(())
    }
    Command::History { who } => {
      let id = output::find_participant(&client.list_participants().await?, &who)?;
      let history = client.history(id).await?;
      let score = client.score(id).await?;
      println!("{}", output::history(&history, score.score));
      Ok(())
    }
    Command::Leaderboard => {
      println!("{}", output::leaderboard(&client.leaderboard().await?));
      Ok(())
    }
  }
}

async fn participants(client: &ApiClient, cmd: ParticipantsCmd) -> Result<()> {
  match cmd {
    ParticipantsCmd::Add { name, codename } => {
      let p = client.add_participant(&name, &codename).await?;
      println!("Registered {} as {}", p.name, p.codename);
    }
    ParticipantsCmd::Import { file, delimiter } => {
      let text = if file.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin()).context("reading stdin")?
      } else {
        std::fs::read_to_string(&file)
          .with_context(|| format!("reading {}", file.display()))?
      };
      let outcome = client.import_participants(&text, delimiter).await?;
      println!("Registered {}, skipped {}", outcome.registered, outcome.skipped);
    }
    ParticipantsCmd::List => {
      for p in client.list_participants().await? {
        println!("{}", output::participant_line(&p));
      }
    }
  }
  Ok(())
}

async fn rules(client: &ApiClient, cmd: RulesCmd) -> Result<()> {
  let pubs = client.list_pubs().await?;
  match cmd {
    RulesCmd::List { venue: Some(venue) } => {
      let pub_id = output::find_pub(&pubs, &venue)?;
      for rule in client.pub_rules(pub_id).await? {
        println!("- {}", rule.text);
      }
    }
    RulesCmd::List { venue: None } => {
      let mut overview = Vec::with_capacity(pubs.len());
      for venue in pubs {
        let rules = client.pub_rules(venue.pub_id).await?;
        overview.push((venue, rules));
      }
      println!("{}", output::rules_overview(&overview));
    }
    RulesCmd::Add { venue, text } => {
      let pub_id = output::find_pub(&pubs, &venue)?;
      let rule = client.add_pub_rule(pub_id, &text).await?;
      println!("Added rule: {}", rule.text);
    }
    RulesCmd::Roll { venue } => {
      let pub_id = output::find_pub(&pubs, &venue)?;
      let rule = client.roll_pub_rule(pub_id).await?;
      println!("New rule: {}", rule.text);
    }
  }
  Ok(())
}

async fn resolve_pub(client: &ApiClient, venue: Option<&str>) -> Result<Option<uuid::Uuid>> {
  match venue {
    Some(key) => Ok(Some(output::find_pub(&client.list_pubs().await?, key)?)),
    None => Ok(None),
  }
}

fn tier_of(event: &ludz_core::event::Event) -> String {
  event.tier.map(|t| t.label().to_owned()).unwrap_or_default()
}
