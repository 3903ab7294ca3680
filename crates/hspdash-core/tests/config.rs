use std::path::PathBuf;

use hspdash_core::config::{study_sections, DashboardConfig, SectionSlot};
use hspdash_core::{Block, ConfigError, TabularMetricsPipeline};
use hspdash_parser::{ColumnMapping, RowSet};
use polars::prelude::*;

fn study_config_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config/hsp90.toml")
}

fn rows() -> RowSet {
    let df = df!(
        "subjid" => &["S1", "S2", "S3"],
        "expression_malaria" => &[10.0f64, 5.0, 2.0],
        "expression_treatment" => &[16.0f64, 4.0, 6.0],
        "fold_change" => &[1.6f64, 0.8, 3.0],
    )
    .unwrap();
    RowSet::new(df, &ColumnMapping::default()).unwrap()
}

#[test]
fn defaults_reproduce_study_constants() {
    let config = DashboardConfig::default();
    assert_eq!(config.columns.fold_change, "fold_change");
    assert_eq!(config.labels.baseline, "day0");
    assert_eq!(config.labels.treatment, "day2");
    assert_eq!(config.thresholds.upregulated_above, 1.6);
    assert_eq!(config.thresholds.downregulated_below, 0.6);
    assert_eq!(config.charts.expression.baseline_color, "blue");
    let slots: Vec<SectionSlot> = config.sections.iter().map(|s| s.slot).collect();
    assert_eq!(
        slots,
        vec![SectionSlot::Background, SectionSlot::Methods, SectionSlot::Results]
    );
    assert!(config
        .section(SectionSlot::Methods)
        .unwrap()
        .body
        .contains("Forty-five samples"));
}

#[test]
fn empty_toml_is_all_defaults() {
    let config = DashboardConfig::from_toml_str("").unwrap();
    assert_eq!(config, DashboardConfig::default());
}

#[test]
fn partial_toml_overrides_only_named_keys() {
    let config = DashboardConfig::from_toml_str(
        r#"
        title = "Pilot"

        [labels]
        treatment = "day7"

        [thresholds]
        upregulated_above = 2.0
        "#,
    )
    .unwrap();

    assert_eq!(config.title, "Pilot");
    assert_eq!(config.labels.baseline, "day0");
    assert_eq!(config.labels.treatment, "day7");
    assert_eq!(config.thresholds.upregulated_above, 2.0);
    assert_eq!(config.thresholds.downregulated_below, 0.6);
}

#[test]
fn invalid_values_are_rejected() {
    let same_labels = DashboardConfig::from_toml_str(
        r#"
        [labels]
        baseline = "d"
        treatment = "d"
        "#,
    );
    assert!(matches!(same_labels, Err(ConfigError::Invalid(_))));

    let bad_thresholds = DashboardConfig::from_toml_str(
        r#"
        [thresholds]
        downregulated_below = -1.0
        "#,
    );
    assert!(matches!(bad_thresholds, Err(ConfigError::Invalid(_))));

    let not_toml = DashboardConfig::from_toml_str("title = ");
    assert!(matches!(not_toml, Err(ConfigError::Toml(_))));
}

#[test]
fn study_config_file_loads_with_all_sections() {
    let config = DashboardConfig::from_path(study_config_path()).unwrap();

    assert_eq!(config.sections.len(), 3);
    assert_eq!(
        config.section(SectionSlot::Background).unwrap().heading,
        "Study Background"
    );
    assert!(config
        .section(SectionSlot::Methods)
        .unwrap()
        .body
        .contains("Forty-five samples"));
}

#[test]
fn missing_config_file_is_io_error() {
    let err = DashboardConfig::from_path("/nonexistent/hspdash.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn dashboard_layout_follows_study_order() {
    let config = DashboardConfig::from_path(study_config_path()).unwrap();
    let page = TabularMetricsPipeline::new(config).dashboard(&rows()).unwrap();

    let headers: Vec<&str> = page
        .blocks
        .iter()
        .filter_map(|block| match block {
            Block::Header { text } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(
        headers,
        vec![
            "This page describes analysis on the differential expression of Heat Shock Proteins in Plasmodium falciparum",
            "Study Background",
            "HSP90_Metadata",
            "Methods",
            "Descriptive_statistics",
            "Results",
            "Fold-change categories",
            "Correlation Matrix",
        ]
    );
    assert_eq!(page.charts().count(), 2);
    assert_eq!(page.title, "HSP90 differential expression");
}

#[test]
fn default_page_carries_every_narrative_slot() {
    let page = TabularMetricsPipeline::default().dashboard(&rows()).unwrap();

    for heading in ["Study Background", "Methods", "Results"] {
        let at = page
            .blocks
            .iter()
            .position(|block| matches!(block, Block::Header { text } if text == heading))
            .unwrap_or_else(|| panic!("missing {heading} header"));
        assert!(
            matches!(&page.blocks[at + 1], Block::Markdown { text } if !text.trim().is_empty()),
            "{heading} has no body"
        );
    }
}

#[test]
fn explicit_empty_sections_drop_the_narrative() {
    let config = DashboardConfig::from_toml_str("sections = []").unwrap();
    let page = TabularMetricsPipeline::new(config).dashboard(&rows()).unwrap();
    assert!(!page
        .blocks
        .iter()
        .any(|block| matches!(block, Block::Header { text } if text == "Methods")));
}

#[test]
fn study_config_file_matches_built_in_narrative() {
    let words = |text: &str| text.split_whitespace().collect::<Vec<_>>().join(" ");
    let from_file = DashboardConfig::from_path(study_config_path()).unwrap().sections;
    let built_in = study_sections();

    assert_eq!(from_file.len(), built_in.len());
    for (file, default) in from_file.iter().zip(built_in.iter()) {
        assert_eq!(file.slot, default.slot);
        assert_eq!(file.heading, default.heading);
        assert_eq!(words(&file.body), words(&default.body));
    }
}
