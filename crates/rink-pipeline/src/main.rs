//! rink binary.
//!
//! Reads `rink.toml` (or the path specified with `--config`) plus `RINK_*`
//! environment variables, then either runs the scrape pipeline or queries
//! the match database it built.
//!
//! ```
//! cargo run -p rink-pipeline --bin rink -- run --days 2 --league khl
//! cargo run -p rink-pipeline --bin rink -- scorers --limit 5
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rink_core::source::Notifier as _;
use rink_extract::NameValidator;
use rink_pipeline::{ConsoleNotifier, Pipeline, PipelineConfig};
use rink_scrape::HttpSource;
use rink_store_json::{FsCache, JsonStore};
use rink_store_sqlite::{MatchRow, PlayerTally, SqliteStore, TimeFilter};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Hockey match scraper and database builder")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "rink.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Scrape recent results pages and rebuild the database.
  Run {
    /// Days to scrape, counting back from yesterday.
    #[arg(short, long)]
    days:   Option<u32>,
    /// Substring match URLs must contain, or "all".
    #[arg(short, long)]
    league: Option<String>,
  },
  /// Players with the most goals.
  Scorers {
    #[arg(short = 'n', long, default_value_t = 10)]
    limit: u32,
  },
  /// Players with the most penalties.
  Penalized {
    #[arg(short = 'n', long, default_value_t = 10)]
    limit: u32,
  },
  /// Per-team matches, goals and penalties.
  Teams,
  /// Everything stored about one match.
  Match { id: i64 },
  /// List matches, optionally by kickoff time ("19:30" or "18:00-21:00").
  Matches { time: Option<String> },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let cfg = PipelineConfig::load(&cli.config)
    .context("failed to load configuration")?
    .expand_paths();

  match cli.command {
    Command::Run { days, league } => run(&cfg, days, league).await,
    Command::Scorers { limit } => {
      let db = open_db(&cfg).await?;
      print_tallies("Top scorers", &db.top_scorers(limit).await?);
      Ok(())
    }
    Command::Penalized { limit } => {
      let db = open_db(&cfg).await?;
      print_tallies("Most penalized", &db.most_penalized(limit).await?);
      Ok(())
    }
    Command::Teams => {
      let db = open_db(&cfg).await?;
      println!("{:<24} {:>7} {:>6} {:>9} {:>8}", "Team", "Matches", "Goals", "Penalties", "G/match");
      for t in db.team_stats().await? {
        println!(
          "{:<24} {:>7} {:>6} {:>9} {:>8.2}",
          t.team,
          t.matches_played,
          t.goals,
          t.penalties,
          t.goals_per_match()
        );
      }
      Ok(())
    }
    Command::Match { id } => {
      let db = open_db(&cfg).await?;
      let detail = db
        .match_detail(id)
        .await?
        .with_context(|| format!("no match with id {id}"))?;
      print_row(&detail.row);
      println!("  {}", detail.url);
      println!(
        "  attendance {} ({}% of {})",
        detail.row.viewers, detail.attendance_pct, detail.capacity
      );
      let names = |entries: &[rink_core::record::LineupEntry]| {
        entries.iter().map(|e| e.name.as_str()).collect::<Vec<_>>().join(", ")
      };
      println!("  {} lineup: {}", detail.row.team1, names(&detail.lineup_team1));
      println!("  {} lineup: {}", detail.row.team2, names(&detail.lineup_team2));
      print_tallies(&format!("{} goals", detail.row.team1), &detail.goals_team1);
      print_tallies(&format!("{} goals", detail.row.team2), &detail.goals_team2);
      print_tallies("Penalties", &detail.penalties);
      Ok(())
    }
    Command::Matches { time } => {
      let db = open_db(&cfg).await?;
      let rows = match time {
        Some(time) => {
          let filter: TimeFilter = time.parse().context("invalid time filter")?;
          db.matches_in_time_range(&filter).await?
        }
        None => db.all_matches().await?,
      };
      rows.iter().for_each(print_row);
      Ok(())
    }
  }
}

async fn run(cfg: &PipelineConfig, days: Option<u32>, league: Option<String>) -> anyhow::Result<()> {
  let mut request = cfg.request();
  if let Some(days) = days {
    request.days_to_scrape = days;
  }
  if let Some(league) = league {
    request.league_filter = league;
  }

  let source = HttpSource::new(&cfg.http).context("failed to build HTTP client")?;
  let pipeline = Pipeline::new(source, JsonStore::new(&cfg.json_path), &cfg.db_path, &cfg.base_url)
    .with_validator(NameValidator::new(cfg.name_policy));

  tracing::info!(
    days = request.days_to_scrape,
    league = %request.league_filter,
    "starting run"
  );
  let today = chrono::Local::now().date_naive();
  let report = match &cfg.cache_dir {
    Some(dir) => pipeline.with_cache(FsCache::new(dir)).run(&request, today).await,
    None => pipeline.run(&request, today).await,
  }
  .context("run failed")?;

  ConsoleNotifier
    .notify(&report)
    .await
    .context("failed to print report")?;
  Ok(())
}

async fn open_db(cfg: &PipelineConfig) -> anyhow::Result<SqliteStore> {
  anyhow::ensure!(
    cfg.db_path.exists(),
    "no database at {:?}; run `rink run` first",
    cfg.db_path
  );
  SqliteStore::open(&cfg.db_path)
    .await
    .with_context(|| format!("failed to open database at {:?}", cfg.db_path))
}

fn print_tallies(title: &str, tallies: &[PlayerTally]) {
  println!("{title}:");
  for (rank, t) in tallies.iter().enumerate() {
    println!("  {:>2}. {:<32} {}", rank + 1, t.player, t.count);
  }
}

fn print_row(row: &MatchRow) {
  println!(
    "#{:<5} {:<5} {} – {} {}  {} ({})",
    row.id,
    row.time.as_deref().unwrap_or("--:--"),
    row.team1,
    row.team2,
    row.score,
    row.stadium,
    row.city,
  );
}
