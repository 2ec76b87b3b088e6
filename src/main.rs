// Rust Countdown
// Terminal front-end for the countdown engine

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use rust_countdown::services::countdown::{
    default_config_path, drive, load_partial_config, CountdownEngine, IntervalScheduler,
    PartialConfig, RenderTarget, SinkResolver,
};

const CONTAINER: &str = "#terminal";

#[derive(Parser)]
#[command(version, about = "Count down to a date or across a duration")]
struct Cli {
    /// Config file (TOML or JSON). Defaults to the platform config dir.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Relative countdown length in seconds
    #[arg(short, long)]
    duration: Option<f64>,

    /// Target date, e.g. "2026-12-31 23:59:59" or RFC 3339
    #[arg(long)]
    date: Option<String>,

    /// Interpret the configured date fields as UTC
    #[arg(long)]
    utc: bool,

    /// Render units without a leading zero
    #[arg(long)]
    no_pad: bool,
}

impl Cli {
    fn overlay(&self) -> PartialConfig {
        let mut partial = PartialConfig::new();
        if let Some(seconds) = self.duration {
            partial = partial.with_duration_ms((seconds * 1000.0).round() as i64);
        }
        if let Some(date) = &self.date {
            partial = partial.with_date(date.clone());
            // A date on the command line overrides a duration from the file
            if self.duration.is_none() {
                partial = partial.with_duration_ms(0);
            }
        }
        if self.utc {
            partial = partial.with_utc(true);
        }
        if self.no_pad {
            partial = partial.with_zero_pad(false);
        }
        partial
    }
}

/// Collects the four slot values and rewrites one terminal line once the
/// seconds slot arrives.
#[derive(Default)]
struct TerminalTarget {
    days: String,
    hours: String,
    minutes: String,
}

impl RenderTarget for TerminalTarget {
    fn render(&mut self, selector: &str, text: &str) -> usize {
        match selector {
            ".days" => self.days = text.to_string(),
            ".hours" => self.hours = text.to_string(),
            ".minutes" => self.minutes = text.to_string(),
            ".seconds" => {
                let mut stdout = io::stdout().lock();
                let _ = write!(
                    stdout,
                    "\r{}d {}:{}:{}  ",
                    self.days, self.hours, self.minutes, text
                );
                let _ = stdout.flush();
            }
            _ => return 0,
        }
        1
    }
}

struct TerminalResolver;

impl SinkResolver for TerminalResolver {
    fn resolve(&self, selector: &str) -> Vec<Box<dyn RenderTarget>> {
        if selector == CONTAINER {
            vec![Box::new(TerminalTarget::default())]
        } else {
            Vec::new()
        }
    }
}

fn load_config(cli: &Cli) -> Result<PartialConfig> {
    if let Some(path) = &cli.config {
        return load_partial_config(path);
    }
    match default_config_path() {
        Some(path) if path.exists() => load_partial_config(&path),
        _ => Ok(PartialConfig::new()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();
    let base = load_config(&cli)?;

    let (scheduler, mut ticks) =
        IntervalScheduler::from_current().context("countdown needs a tokio runtime")?;

    let mut engine = CountdownEngine::new(
        &[CONTAINER],
        base.on_finish(|_| println!("\nCountdown finished")),
        &TerminalResolver,
        Box::new(scheduler),
    );
    engine.update(cli.overlay());

    if let Some(err) = engine.target_error() {
        log::warn!("{}", err);
    }

    let finished = tokio::select! {
        snapshot = drive(&mut engine, &mut ticks) => snapshot,
        _ = tokio::signal::ctrl_c() => None,
    };

    if finished.is_none() {
        engine.stop();
        println!();
        log::info!("Countdown interrupted");
    }

    Ok(())
}
