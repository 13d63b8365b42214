//! End-to-end scenarios over the measurement and ranking engine,
//! exercised without any real network

use rpc_latency_bench::{
    export::ExportDocument,
    models::{BenchConfig, Endpoint, MethodSpec, PairStatistics, RunResult, SampleOutcome},
    output::ReportRenderer,
    ranking, stats,
    types::FailureKind,
};

fn stats_with_median(median: f64) -> PairStatistics {
    stats::summarize(&[
        SampleOutcome::success(median - 10.0),
        SampleOutcome::success(median),
        SampleOutcome::success(median + 10.0),
    ])
}

fn two_provider_config() -> BenchConfig {
    let mut config = BenchConfig::default();
    config.endpoints = vec![
        Endpoint::new("P1", "https://one.example.com"),
        Endpoint::new("P2", "https://two.example.com"),
    ];
    config.methods = vec![MethodSpec::new("getSlot")];
    config.enable_color = false;
    config
}

#[test]
fn scenario_two_providers_ranked_and_compared() {
    let mut result = RunResult::new();
    result.record_pair("getSlot", "P1", stats_with_median(50.0));
    result.record_pair("getSlot", "P2", stats_with_median(100.0));

    let providers = vec!["P1".to_string(), "P2".to_string()];
    let medians = result.medians_for_method("getSlot", &providers);
    let ranking = ranking::rank_by_median(&medians);

    assert_eq!(ranking[0].provider, "P1");
    assert_eq!(ranking[0].rank, 1);
    assert_eq!(ranking[1].provider, "P2");
    assert_eq!(ranking[1].rank, 2);

    let cmp = ranking::pairwise_comparison("P1", 50.0, "P2", 100.0);
    assert_eq!(cmp.faster, "P1");
    assert_eq!(cmp.slower, "P2");
    assert_eq!(cmp.diff_ms, 50.0);
    assert_eq!(cmp.percent, 50.0);
}

#[test]
fn scenario_partial_failures_reduce_over_successes_only() {
    let outcomes = vec![
        SampleOutcome::success(10.0),
        SampleOutcome::success(20.0),
        SampleOutcome::success(30.0),
        SampleOutcome::failure(FailureKind::Timeout, "10s exceeded"),
        SampleOutcome::failure(FailureKind::Timeout, "10s exceeded"),
    ];
    let stats = stats::summarize(&outcomes);

    assert_eq!(stats.min, Some(10.0));
    assert_eq!(stats.max, Some(30.0));
    assert_eq!(stats.median, Some(20.0));
    assert_eq!(stats.avg, Some(20.0));
    assert_eq!(stats.stdev, Some(10.0));
    assert_eq!(stats.success_count, 3);
    assert_eq!(stats.failure_count, 2);
    assert_eq!(stats.sample_count(), 5);
}

#[test]
fn scenario_unreachable_provider_excluded_from_ranking_but_exported() {
    let mut config = two_provider_config();
    config.export_records = true;

    let mut result = RunResult::new();
    result.record_pair("getSlot", "P1", stats_with_median(50.0));
    result.record_pair("getSlot", "P2", PairStatistics::all_failed(5));

    let providers = config.provider_order();
    let medians = result.medians_for_method("getSlot", &providers);
    assert_eq!(medians.len(), 1);
    assert_eq!(medians[0].0, "P1");

    let document = ExportDocument::from_result(&config, &result);
    assert_eq!(document.methods["getSlot"]["P2"].failure_count, 5);
    assert!(document.methods["getSlot"]["P2"].median.is_none());

    let records = document.records.unwrap();
    let dead_row = records.iter().find(|r| r.provider == "P2").unwrap();
    assert_eq!(dead_row.success_count, 0);
    assert_eq!(dead_row.failure_count, 5);
}

#[test]
fn scenario_overall_rank_tie_resolved_by_declaration_order() {
    let mut result = RunResult::new();
    result.record_pair("methodA", "P1", stats_with_median(50.0));
    result.record_pair("methodA", "P2", stats_with_median(100.0));
    result.record_pair("methodB", "P1", stats_with_median(100.0));
    result.record_pair("methodB", "P2", stats_with_median(50.0));

    let methods = vec!["methodA".to_string(), "methodB".to_string()];
    let providers = vec!["P1".to_string(), "P2".to_string()];
    let overall = ranking::overall_ranking(&result, &methods, &providers);

    assert_eq!(overall[0].average_rank, 1.5);
    assert_eq!(overall[1].average_rank, 1.5);
    assert_eq!(overall[0].provider, "P1");
    assert_eq!(overall[1].provider, "P2");
}

#[test]
fn export_round_trip_preserves_all_pairs() {
    let config = two_provider_config();

    let mut result = RunResult::new();
    result.record_network("P1", stats_with_median(15.0));
    result.record_network("P2", PairStatistics::all_failed(5));
    result.record_pair("getSlot", "P1", stats_with_median(50.0));
    result.record_pair("getSlot", "P2", stats_with_median(100.0));

    let document = ExportDocument::from_result(&config, &result);
    let json = serde_json::to_string_pretty(&document).unwrap();
    let parsed: ExportDocument = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.run_id, result.run_id);
    assert_eq!(parsed.methods, result.methods);
    assert_eq!(parsed.network, result.network);
}

#[test]
fn report_renders_scenario_results() {
    let config = two_provider_config();
    let mut result = RunResult::new();
    result.record_pair("getSlot", "P1", stats_with_median(50.0));
    result.record_pair("getSlot", "P2", stats_with_median(100.0));

    let report = ReportRenderer::new(&config, &result).render();
    assert!(report.contains("P1 is 50.0ms (50.0%) faster than P2"));
    assert!(report.contains("Overall ranking"));
}
