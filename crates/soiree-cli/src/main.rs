//! `soiree` — command-line client for the Soirée guest list.
//!
//! # Usage
//!
//! ```
//! soiree import roster.csv
//! soiree add "Ada Lovelace" --number 555-0100
//! soiree list --search ada
//! soiree check-in 3f2a9c1e-...
//! soiree report
//! soiree --url http://host:3210 export --output roster.csv
//! ```

mod client;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig, NewGuestBody};
use serde::Deserialize;
use soiree_core::guest::Guest;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "soiree", about = "Command-line client for the Soirée guest list")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the soiree server (default: http://localhost:3210).
  #[arg(long, env = "SOIREE_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Import guests from a CSV roster, replacing the current list.
  Import {
    /// Path to the CSV file (`Name` column required, `Phone` optional).
    file: PathBuf,
  },
  /// Add a single guest.
  Add {
    /// Guest name.
    name: String,
    /// Phone number.
    #[arg(long)]
    number: Option<String>,
  },
  /// List guests, optionally filtered by a name fragment.
  List {
    /// Case-insensitive name fragment.
    #[arg(long)]
    search: Option<String>,
  },
  /// Check a guest in by id.
  CheckIn {
    guest_id: Uuid,
  },
  /// Print the attendance report.
  Report,
  /// Export the guest list as CSV.
  Export {
    /// Write to a file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
  },
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
  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let base_url = args
    .url
    .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
    .unwrap_or_else(|| "http://localhost:3210".to_string());

  let client = ApiClient::new(ApiConfig { base_url })?;

  match args.command {
    Command::Import { file } => import(&client, &file).await,
    Command::Add { name, number } => add(&client, name, number).await,
    Command::List { search } => list(&client, search.as_deref()).await,
    Command::CheckIn { guest_id } => check_in(&client, guest_id).await,
    Command::Report => report(&client).await,
    Command::Export { output } => export(&client, output.as_deref()).await,
  }
}

// ─── Commands ─────────────────────────────────────────────────────────────────

async fn import(client: &ApiClient, file: &Path) -> Result<()> {
  let raw = std::fs::read_to_string(file)
    .with_context(|| format!("reading roster {}", file.display()))?;
  let roster = soiree_roster::parse(&raw)?;
  if roster.skipped > 0 {
    eprintln!("skipped {} row(s) with no name", roster.skipped);
  }
  let bodies: Vec<NewGuestBody> = roster
    .guests
    .iter()
    .map(|g| NewGuestBody {
      name:   g.name().to_string(),
      number: g.number().map(str::to_string),
    })
    .collect();
  let replaced = client.replace_guests(&bodies).await?;
  println!("imported {} guest(s)", replaced.len());
  Ok(())
}

async fn add(
  client: &ApiClient,
  name: String,
  number: Option<String>,
) -> Result<()> {
  let guest = client.add_guest(&NewGuestBody { name, number }).await?;
  println!("added {} ({})", guest.name, guest.guest_id);
  Ok(())
}

async fn list(client: &ApiClient, search: Option<&str>) -> Result<()> {
  let collection = client.list_guests(search).await?;
  if collection.stale {
    eprintln!("warning: live updates lost; showing last known data");
  }
  let attended = collection
    .guests
    .iter()
    .filter(|g| g.checked_in_at.is_some())
    .count();
  for g in &collection.guests {
    let arrival = match g.checked_in_at {
      Some(at) => format!("checked in {}", clock(at)),
      None => "-".to_string(),
    };
    println!(
      "{}  {:<24}  {:<16}  {arrival}",
      g.guest_id,
      g.name,
      g.number.as_deref().unwrap_or(""),
    );
  }
  println!("{} guest(s), {attended} checked in", collection.guests.len());
  Ok(())
}

async fn check_in(client: &ApiClient, id: Uuid) -> Result<()> {
  let guest = client.check_in(id).await?;
  match guest.checked_in_at {
    Some(at) => println!("{} checked in at {}", guest.name, clock(at)),
    None => println!("{} checked in", guest.name),
  }
  Ok(())
}

async fn report(client: &ApiClient) -> Result<()> {
  let report = client.report().await?;
  println!("Attended:      {}", report.attended);
  println!("Not attended:  {}", report.not_attended);
  match report.peak {
    Some(w) => println!(
      "Peak window:   {} to {} ({} arrival(s))",
      clock(w.start),
      clock(w.end),
      w.count,
    ),
    None => println!("Peak window:   no check-ins yet"),
  }
  print_arrivals("First arrivals", &report.first_arrivals);
  print_arrivals("Latest arrivals", &report.latest_arrivals);
  Ok(())
}

async fn export(client: &ApiClient, output: Option<&Path>) -> Result<()> {
  let collection = client.list_guests(None).await?;
  let csv = soiree_roster::serialize(&collection.guests);
  match output {
    Some(path) => {
      std::fs::write(path, &csv)
        .with_context(|| format!("writing {}", path.display()))?;
      println!(
        "wrote {} guest(s) to {}",
        collection.guests.len(),
        path.display()
      );
    }
    None => print!("{csv}"),
  }
  Ok(())
}

// ─── Rendering helpers ────────────────────────────────────────────────────────

fn print_arrivals(label: &str, guests: &[Guest]) {
  if guests.is_empty() {
    return;
  }
  println!("{label}:");
  for g in guests {
    match g.checked_in_at {
      Some(at) => println!("  {}  {}", clock(at), g.name),
      None => println!("  {}", g.name),
    }
  }
}

/// Render a UTC timestamp as local wall-clock `HH:MM`.
fn clock(t: DateTime<Utc>) -> String {
  t.with_timezone(&Local).format("%H:%M").to_string()
}
