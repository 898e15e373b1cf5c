use claims_eda::analysis::EdaAnalyzer;
use claims_eda::{pipeline, PipelineConfig};
use polars::prelude::*;
use std::path::PathBuf;

const YEAR: i32 = 2026;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/claims_sample.txt")
}

#[test]
fn test_pipeline_cleans_fixture() {
    let output = pipeline::run(fixture(), &PipelineConfig::default(), YEAR).unwrap();
    let report = &output.report;

    assert_eq!(report.initial_rows, 10);
    assert_eq!(report.initial_columns, 16);
    assert_eq!(report.claims_imputed, 2);
    assert_eq!(report.dropped_columns, vec!["CrossBorder".to_string()]);
    assert_eq!(report.rows_missing_critical, 2);
    assert_eq!(report.duplicate_rows, 1);
    assert_eq!(report.invalid_rows, 3);
    assert_eq!(report.final_rows, 4);
    assert_eq!(report.final_columns, 15);

    let df = &output.df;
    assert_eq!(df.shape(), (4, 15));

    let ids: Vec<Option<&str>> = df
        .column("UnderwrittenCoverID")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(
        ids,
        vec![Some("145249"), Some("145248"), Some("145261"), Some("145264")]
    );
}

#[test]
fn test_pipeline_invariants_hold() {
    let config = PipelineConfig::default();
    let output = pipeline::run(fixture(), &config, YEAR).unwrap();
    let df = &output.df;

    assert_eq!(df.column("TotalClaims").unwrap().null_count(), 0);
    for name in &config.cleaning.critical_cols {
        assert_eq!(df.column(name).unwrap().null_count(), 0, "column {}", name);
    }

    let premiums = df.column("TotalPremium").unwrap().f64().unwrap();
    assert!(premiums.into_iter().flatten().all(|p| p > 0.0));

    let years = df.column("RegistrationYear").unwrap().f64().unwrap();
    assert!(years
        .into_iter()
        .flatten()
        .all(|y| y > 1980.0 && y <= YEAR as f64));

    let unique = df
        .unique_stable(None, UniqueKeepStrategy::First, None)
        .unwrap();
    assert_eq!(unique.height(), df.height());
}

#[test]
fn test_pipeline_threshold_from_config() {
    let config = PipelineConfig::from_toml_str(
        r#"
        [cleaning]
        null_threshold_pct = 95.0
        "#,
    )
    .unwrap();
    let output = pipeline::run(fixture(), &config, YEAR).unwrap();

    assert!(output.report.dropped_columns.is_empty());
    assert_eq!(output.df.width(), 16);
}

#[test]
fn test_pipeline_earlier_year_bound() {
    // the 2014 and 2031 registrations now fall outside the window
    let output = pipeline::run(fixture(), &PipelineConfig::default(), 2012).unwrap();
    assert_eq!(output.report.final_rows, 3);
}

#[test]
fn test_analysis_on_cleaned_table() {
    let config = PipelineConfig::default();
    let output = pipeline::run(fixture(), &config, YEAR).unwrap();
    let analyzer = EdaAnalyzer::new(&output.df, config.analysis.clone());

    let numeric = analyzer.distribution_summary(None).unwrap();
    let names: Vec<&str> = numeric.iter().map(|s| s.column.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "RegistrationYear",
            "SumInsured",
            "CalculatedPremiumPerTerm",
            "TotalPremium",
            "TotalClaims"
        ]
    );
    let claims = &numeric[4];
    assert_eq!(claims.count, 4);
    assert_eq!(claims.max, 1500.0);
    assert_eq!(claims.median, 0.0);

    let categorical = analyzer.categorical_summary(None).unwrap();
    let columns: Vec<&str> = categorical.iter().map(|s| s.column.as_str()).collect();
    assert_eq!(columns, vec!["Gender", "Province"]);

    let gender = &categorical[0];
    assert_eq!(gender.counts[0].label, "Male");
    assert_eq!(gender.counts[0].count, 3);

    let province = &categorical[1];
    assert_eq!(province.counts[0].label, "Gauteng");
    assert_eq!(province.counts[1].label, "Western Cape");
    assert_eq!(province.counts[1].count, 2);
}
