mod cache;
mod config;
mod error;
mod pokeapi;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use cache::{CacheCoordinator, JsonFileStore, MemoryStore, StoreBackend};
use config::Config;
use pokeapi::{Lookup, PokeClient, PokemonDetail, PokemonSummary};

#[derive(Parser, Debug)]
#[command(name = "podex")]
#[command(about = "A terminal viewer for the PokeAPI catalog with a persistent local cache")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/podex/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Keep the cache in memory only, don't touch the durable store
  #[arg(long)]
  no_store: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List a page of the catalog
  List {
    #[arg(long, default_value_t = 0)]
    offset: u32,
    /// Page size (default: config page_size)
    #[arg(long)]
    limit: Option<u32>,
  },
  /// Show the full record for one pokemon, by id or name
  Show { id_or_name: String },
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();
  let config = Config::load(args.config.as_deref())?;

  if args.no_store {
    run(args.command, &config, MemoryStore::default()).await
  } else {
    let backend = match &config.store_path {
      Some(path) => JsonFileStore::open(path.clone()),
      None => JsonFileStore::open_default()?,
    };
    run(args.command, &config, backend).await
  }
}

async fn run<S: StoreBackend>(command: Command, config: &Config, backend: S) -> Result<()> {
  let client = PokeClient::new(&config.api);
  let coordinator = CacheCoordinator::new(client, backend);

  match command {
    Command::List { offset, limit } => {
      let page = coordinator
        .get_page(offset, limit.unwrap_or(config.page_size))
        .await?;
      for summary in &page {
        print_summary(summary);
      }
    }
    Command::Show { id_or_name } => {
      let detail = coordinator.get_by_id(Lookup::parse(&id_or_name)).await?;
      let detail = if detail.partial {
        // A partial record means a background upgrade is running; wait so
        // the one-shot CLI can print the full record.
        coordinator.wait_for_upgrades().await;
        let detail = coordinator.get_by_id(detail.id).await.unwrap_or(detail);
        if detail.partial {
          // The upgrade failed and the re-read spawned another; settle
          // it too rather than exit with work in flight.
          coordinator.wait_for_upgrades().await;
        }
        detail
      } else {
        detail
      };
      print_detail(&detail);
    }
  }

  Ok(())
}

fn print_summary(summary: &PokemonSummary) {
  println!("#{:<4} {}", summary.id, capitalize(&summary.name));
}

fn print_detail(detail: &PokemonDetail) {
  println!("#{} {}", detail.id, capitalize(&detail.name));
  if detail.partial {
    println!("(partial record; full details not fetched yet)");
    return;
  }

  let types: Vec<&str> = detail.types.iter().map(|t| t.name.as_str()).collect();
  println!("Types:     {}", types.join(", "));

  let abilities: Vec<&str> = detail.abilities.iter().map(|a| a.name.as_str()).collect();
  println!("Abilities: {}", abilities.join(", "));

  if let Some(height) = detail.height {
    println!("Height:    {}", height);
  }
  if let Some(weight) = detail.weight {
    println!("Weight:    {}", weight);
  }
  if let Some(species) = &detail.species {
    println!("Species:   {}", species.name);
  }

  if !detail.stats.is_empty() {
    println!();
    for stat in &detail.stats {
      println!(
        "{:<16} {:>3} {}",
        stat.name,
        stat.base_stat,
        stat_bar(stat.base_stat)
      );
    }
  }

  if !detail.moves.is_empty() {
    println!();
    println!("Moves: {}", detail.moves.len());
  }
}

/// Fixed-scale bar for a base stat, 160 is treated as the max.
fn stat_bar(value: u32) -> String {
  const MAX_STAT: u32 = 160;
  const WIDTH: u32 = 20;
  let filled = (value.min(MAX_STAT) * WIDTH).div_ceil(MAX_STAT);
  let mut bar = String::new();
  for i in 0..WIDTH {
    bar.push(if i < filled { '█' } else { '░' });
  }
  bar
}

fn capitalize(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    None => String::new(),
  }
}
