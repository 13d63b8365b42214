//! Terminal output: live progress lines and the final comparison report

mod report;

pub use report::ReportRenderer;

use crate::{
    executor::ProbeObserver,
    models::{BenchConfig, PairStatistics, SampleOutcome},
    types::LatencyLevel,
};
use colored::Colorize;

/// Format a latency value, color-coded by its classification
pub(crate) fn paint_latency(ms: f64, enable_color: bool) -> String {
    let text = format!("{:.1}ms", ms);
    if !enable_color {
        return text;
    }
    match LatencyLevel::from_ms(ms) {
        LatencyLevel::Fast => text.green(),
        LatencyLevel::Good => text.cyan(),
        LatencyLevel::Moderate => text.yellow(),
        LatencyLevel::Slow => text.red(),
    }
    .to_string()
}

pub(crate) fn paint_heading(text: &str, enable_color: bool) -> String {
    if enable_color {
        text.bold().cyan().to_string()
    } else {
        text.to_string()
    }
}

pub(crate) fn paint_failure(text: &str, enable_color: bool) -> String {
    if enable_color {
        text.red().to_string()
    } else {
        text.to_string()
    }
}

/// Prints probe progress as it happens; silenced by `--quiet`
pub struct ConsoleObserver {
    quiet: bool,
    enable_color: bool,
}

impl ConsoleObserver {
    pub fn new(config: &BenchConfig) -> Self {
        Self {
            quiet: config.quiet,
            enable_color: config.enable_color,
        }
    }
}

impl ProbeObserver for ConsoleObserver {
    fn on_network_phase(&self) {
        if self.quiet {
            return;
        }
        println!();
        println!(
            "{}",
            paint_heading("Network reachability (TCP connect)", self.enable_color)
        );
    }

    fn on_network_probe(&self, provider: &str, host: &str, port: u16) {
        if self.quiet {
            return;
        }
        println!("  {} ({}:{})", provider, host, port);
    }

    fn on_provider_phase(&self, provider: &str, url: &str) {
        if self.quiet {
            return;
        }
        println!();
        let url_note = if self.enable_color {
            format!("({})", url).dimmed().to_string()
        } else {
            format!("({})", url)
        };
        println!(
            "{} {}",
            paint_heading(&format!("Provider: {}", provider), self.enable_color),
            url_note
        );
    }

    fn on_probe_start(&self, _provider: &str, method: &str) {
        if self.quiet {
            return;
        }
        println!("  {}", method);
    }

    fn on_attempt(&self, attempt: u32, total: u32, outcome: &SampleOutcome) {
        if self.quiet {
            return;
        }
        match outcome {
            SampleOutcome::Success { elapsed_ms } => {
                println!(
                    "    attempt {}/{}: {}",
                    attempt,
                    total,
                    paint_latency(*elapsed_ms, self.enable_color)
                );
            }
            SampleOutcome::Failure { kind, detail } => {
                println!(
                    "    attempt {}/{}: {}",
                    attempt,
                    total,
                    paint_failure(&format!("failed ({}): {}", kind, detail), self.enable_color)
                );
            }
        }
    }

    fn on_probe_complete(&self, _provider: &str, _method: &str, stats: &PairStatistics) {
        if self.quiet {
            return;
        }
        match stats.median {
            Some(median) => println!(
                "    -> median {} ({}/{} ok)",
                paint_latency(median, self.enable_color),
                stats.success_count,
                stats.sample_count()
            ),
            None => println!(
                "    -> {}",
                paint_failure(
                    &format!("all {} attempts failed", stats.sample_count()),
                    self.enable_color
                )
            ),
        }
    }
}
