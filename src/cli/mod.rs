mod report;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::{Settings, DEFAULT_DAYS, DEFAULT_REFRESH_SECS};
use crate::logging;
use crate::services::{insights, EmptyModelPolicy, Insight, LoadResult, SnapshotCacheService};

use report::{render_history, render_insights, render_stats, HistoryRow, StatsReport};

/// Terminal dashboard for AI cost-optimization statistics
#[derive(Parser)]
#[command(name = "optiboard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Dashboard API base URL
    #[arg(long, env = "OPTIBOARD_API_URL", global = true)]
    api_url: Option<String>,

    /// Bearer token for the dashboard API
    #[arg(long, env = "OPTIBOARD_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Summary window in days
    #[arg(long, default_value_t = DEFAULT_DAYS, global = true)]
    days: u32,

    /// Read the summary from a JSON file instead of the API
    #[arg(long, value_name = "PATH", global = true)]
    file: Option<PathBuf>,

    /// Use the newest cached snapshot instead of the API
    #[arg(long, global = true)]
    offline: bool,

    /// Reject summaries with out-of-range or duplicate values
    #[arg(long, global = true)]
    strict: bool,

    /// Report 0 instead of NaN for scores over an empty model list
    #[arg(long, global = true)]
    zero_empty: bool,

    /// Snapshot cache directory
    #[arg(long, value_name = "DIR", global = true)]
    cache_dir: Option<PathBuf>,

    /// TUI auto-refresh interval in seconds (0 disables)
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_REFRESH_SECS, global = true)]
    refresh: u64,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

impl GlobalArgs {
    fn settings(&self) -> anyhow::Result<Settings> {
        let cache_dir = match &self.cache_dir {
            Some(dir) => dir.clone(),
            None => SnapshotCacheService::default_cache_dir()?,
        };

        Ok(Settings {
            api_url: self.api_url.clone(),
            token: self.token.clone(),
            days: self.days,
            file: self.file.clone(),
            offline: self.offline,
            strict: self.strict,
            empty_models: if self.zero_empty {
                EmptyModelPolicy::Zero
            } else {
                EmptyModelPolicy::Propagate
            },
            cache_dir,
            refresh_interval: Duration::from_secs(self.refresh),
        })
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch interactive TUI (default)
    Tui,

    /// Show derived optimization statistics
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show insights derived from the statistics
    Insights {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show scores of every cached snapshot
    History {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete old cached snapshots
    Prune {
        /// Number of newest snapshots to keep
        #[arg(long, default_value_t = 30)]
        keep: usize,
    },
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let settings = self.global.settings()?;
        let command = self.command.unwrap_or(Commands::Tui);

        // TUI gets no subscriber: log lines would tear the alternate screen
        if !matches!(command, Commands::Tui) {
            logging::init(self.global.verbose);
        }

        match command {
            Commands::Tui => crate::tui::run(settings),
            Commands::Stats { json } => run_stats(&settings, json),
            Commands::Insights { json } => run_insights(&settings, json),
            Commands::History { json } => run_history(&settings, json),
            Commands::Prune { keep } => {
                let removed = settings.snapshot_cache().prune(keep)?;
                println!("Removed {} snapshot(s), kept at most {}", removed, keep);
                Ok(())
            }
        }
    }
}

/// Load through the configured source, surfacing cache trouble in the log
fn load(settings: &Settings) -> anyhow::Result<LoadResult> {
    let loaded = settings.data_loader()?.load()?;
    log_cache_warning(&loaded);
    Ok(loaded)
}

fn log_cache_warning(loaded: &LoadResult) {
    if let Some(warning) = &loaded.cache_warning {
        tracing::warn!(%warning, "snapshot cache");
    }
}

fn run_stats(settings: &Settings, json: bool) -> anyhow::Result<()> {
    let loaded = load(settings)?;
    let stats = settings.aggregator().compute(Some(&loaded.summary));
    if json {
        let report = StatsReport {
            source: &loaded.source,
            stale: loaded.stale,
            stats: &stats,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_stats(&loaded.source, loaded.stale, &stats));
    }
    Ok(())
}

fn run_insights(settings: &Settings, json: bool) -> anyhow::Result<()> {
    let loaded = load(settings)?;
    let stats = settings.aggregator().compute(Some(&loaded.summary));
    let all: Vec<Insight> = insights(&stats).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&all)?);
    } else {
        print!("{}", render_insights(&all));
    }
    Ok(())
}

fn run_history(settings: &Settings, json: bool) -> anyhow::Result<()> {
    let (snapshots, warnings) = settings.snapshot_cache().history();
    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "some snapshots could not be read");
    }

    let aggregator = settings.aggregator();
    let rows: Vec<HistoryRow> = snapshots
        .iter()
        .map(|s| HistoryRow::from_snapshot(s, &aggregator))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", render_history(&rows));
    }
    Ok(())
}
