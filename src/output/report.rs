//! Final comparison report
//!
//! Rendered entirely from a finished `RunResult`; the renderer holds no
//! state of its own and can be called repeatedly. Everything is built
//! into a `String` first so tests can assert on the exact output.

use crate::{
    models::{BenchConfig, PairStatistics, RunResult},
    output::{paint_failure, paint_heading, paint_latency},
    ranking::{self, RankedProvider},
};
use std::fmt::Write;

const BAR_WIDTH: usize = 20;

/// Headroom factor so even the fastest provider's bar stays short of
/// full width, keeping outliers visually distinguishable
const BAR_HEADROOM: f64 = 1.2;

pub struct ReportRenderer<'a> {
    config: &'a BenchConfig,
    result: &'a RunResult,
}

impl<'a> ReportRenderer<'a> {
    pub fn new(config: &'a BenchConfig, result: &'a RunResult) -> Self {
        Self { config, result }
    }

    pub fn print(&self) {
        println!("{}", self.render());
    }

    /// Build the complete report
    pub fn render(&self) -> String {
        let mut out = String::new();
        let providers = self.config.provider_order();
        let methods: Vec<String> = self
            .config
            .methods
            .iter()
            .map(|m| m.method.clone())
            .collect();

        self.render_header(&mut out);

        if !self.result.network.is_empty() {
            self.render_network(&mut out, &providers);
        }

        for method in &methods {
            self.render_method(&mut out, method, &providers);
        }

        self.render_overall(&mut out, &methods, &providers);
        out
    }

    fn heading(&self, text: &str) -> String {
        paint_heading(text, self.config.enable_color)
    }

    fn latency(&self, ms: f64) -> String {
        paint_latency(ms, self.config.enable_color)
    }

    fn render_header(&self, out: &mut String) {
        let rule = "=".repeat(64);
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(
            out,
            "{}",
            self.heading(&format!(" RPC Latency Benchmark  (run {})", self.result.run_id))
        );
        let _ = writeln!(
            out,
            " Started: {}   Samples per pair: {}",
            self.result.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.config.num_tests
        );
        let _ = writeln!(out, "{}", rule);
    }

    fn render_network(&self, out: &mut String, providers: &[String]) {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", self.heading("Network reachability"));

        let width = name_width(providers);
        for provider in providers {
            let Some(stats) = self.result.network.get(provider) else {
                continue;
            };
            let _ = writeln!(
                out,
                "  {:<width$}  {}",
                provider,
                self.stats_line(stats),
                width = width
            );
        }
    }

    fn render_method(&self, out: &mut String, method: &str, providers: &[String]) {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", self.heading(&format!("Method: {}", method)));

        let Some(pairs) = self.result.methods.get(method) else {
            return;
        };

        let medians = self.result.medians_for_method(method, providers);
        let best = medians
            .iter()
            .map(|(_, m)| *m)
            .fold(f64::INFINITY, f64::min);

        let width = name_width(providers);
        for provider in providers {
            let Some(stats) = pairs.get(provider) else {
                continue;
            };
            let _ = writeln!(
                out,
                "  {:<width$}  {}",
                provider,
                self.stats_line(stats),
                width = width
            );
            if let Some(median) = stats.median {
                if let Some(scale) = ranking::relative_scale(median, best) {
                    let _ = writeln!(out, "  {:<width$}  {}", "", bar(scale), width = width);
                }
            }
        }

        if medians.len() >= 2 {
            self.render_pairwise(out, &medians);
            self.render_ranking(out, &ranking::rank_by_median(&medians));
        }
    }

    fn render_pairwise(&self, out: &mut String, medians: &[(String, f64)]) {
        let _ = writeln!(out, "  Pairwise:");
        for i in 0..medians.len() {
            for j in (i + 1)..medians.len() {
                let cmp = ranking::pairwise_comparison(
                    &medians[i].0,
                    medians[i].1,
                    &medians[j].0,
                    medians[j].1,
                );
                let _ = writeln!(
                    out,
                    "    {} is {} ({:.1}%) faster than {}",
                    cmp.faster,
                    self.latency(cmp.diff_ms),
                    cmp.percent,
                    cmp.slower
                );
            }
        }
    }

    fn render_ranking(&self, out: &mut String, ranking: &[RankedProvider]) {
        let _ = writeln!(out, "  Ranking:");
        for entry in ranking {
            let _ = writeln!(
                out,
                "    {} {}. {}  {}",
                medal(entry.rank),
                entry.rank,
                entry.provider,
                self.latency(entry.median)
            );
        }
    }

    fn render_overall(&self, out: &mut String, methods: &[String], providers: &[String]) {
        let overall = ranking::overall_ranking(self.result, methods, providers);
        if overall.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "{}",
                paint_failure("No provider completed any method", self.config.enable_color)
            );
            return;
        }

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{}",
            self.heading("Overall ranking (average rank across methods)")
        );
        for (position, entry) in overall.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {} {}. {}  (avg rank {:.2})",
                medal(position + 1),
                position + 1,
                entry.provider,
                entry.average_rank
            );
        }
    }

    /// One provider's statistics on a single line
    fn stats_line(&self, stats: &PairStatistics) -> String {
        if !stats.has_statistics() {
            return paint_failure(
                &format!("all {} attempts failed", stats.sample_count()),
                self.config.enable_color,
            );
        }

        // Derived fields are all present once any attempt succeeded
        let (min, median, avg, max, stdev) = (
            stats.min.unwrap_or(0.0),
            stats.median.unwrap_or(0.0),
            stats.avg.unwrap_or(0.0),
            stats.max.unwrap_or(0.0),
            stats.stdev.unwrap_or(0.0),
        );
        format!(
            "min {}  median {}  avg {}  max {}  stdev {:.1}  ({}/{} ok)",
            self.latency(min),
            self.latency(median),
            self.latency(avg),
            self.latency(max),
            stdev,
            stats.success_count,
            stats.sample_count()
        )
    }
}

fn name_width(providers: &[String]) -> usize {
    providers.iter().map(|p| p.len()).max().unwrap_or(0)
}

fn medal(rank: usize) -> &'static str {
    match rank {
        1 => "\u{1F947}",
        2 => "\u{1F948}",
        3 => "\u{1F949}",
        _ => "  ",
    }
}

/// Horizontal bar proportional to `scale` in (0, 1]
fn bar(scale: f64) -> String {
    let filled = ((scale * BAR_WIDTH as f64 / BAR_HEADROOM).round() as usize).min(BAR_WIDTH);
    let mut bar = String::with_capacity(BAR_WIDTH * 3);
    for _ in 0..filled {
        bar.push('\u{2588}');
    }
    for _ in filled..BAR_WIDTH {
        bar.push('\u{2591}');
    }
    bar
}
