use std::fs;
use std::path::Path;

use hspdash_parser::ColumnMapping;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::charts::ChartsConfig;
use crate::classify::FoldChangeThresholds;
use crate::error::ConfigError;
use crate::reshape::DayLabels;

/// Where a narrative block sits in the page layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionSlot {
    Background,
    Methods,
    Results,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeSection {
    pub slot: SectionSlot,
    pub heading: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    pub header: String,
    pub data_heading: String,
    pub columns: ColumnMapping,
    pub labels: DayLabels,
    pub thresholds: FoldChangeThresholds,
    pub charts: ChartsConfig,
    /// Narrative blocks by slot. Omitting the key keeps the study text; `sections = []` drops it.
    pub sections: Vec<NarrativeSection>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "HSP90 differential expression".to_string(),
            header: "This page describes analysis on the differential expression of Heat Shock \
                     Proteins in Plasmodium falciparum"
                .to_string(),
            data_heading: "HSP90_Metadata".to_string(),
            columns: ColumnMapping::default(),
            labels: DayLabels::default(),
            thresholds: FoldChangeThresholds::default(),
            charts: ChartsConfig::default(),
            sections: study_sections(),
        }
    }
}

const BACKGROUND: &str = "Molecular chaperones are proteins that facilitate the folding of other \
proteins, enabling them to acquire the correct 3D structure needed for their function. The heat \
shock protein 90 (HSP90) family of chaperones is essential for the survival of Plasmodium \
falciparum and helps the parasite cope with febrile episodes and drug pressure in the host. \
PfHSP90 may therefore be a hub for drug resistance.

By comparing HSP90 expression in untreated and treated samples, the study asks whether expression \
differs significantly and whether that difference could serve as a marker of drug efficacy.";

const METHODS: &str = "Cross-sectional study of Plasmodium falciparum positive blood samples \
collected from a stable malaria transmission zone in Kenya. RNA was extracted from dried blood \
spots for day 0 (before treatment) and day 2 (after treatment). Forty-five samples were randomly \
chosen. HSP90 mRNA was amplified by quantitative real-time PCR in triplicate with beta-actin as \
the housekeeping gene, and the fold change between day 0 and day 2 was computed with the \
2^-(ddCt) method.";

const RESULTS: &str = "HSP90 expression was compared between day 0 and day 2 samples from the \
same patients. A fold difference above 1.6 is read as a twofold increase and a fold difference \
below 0.6 as downregulation. The category counts below are computed from the loaded data.";

/// Narrative of the HSP90 day 0 / day 2 study, used when no config replaces it.
pub fn study_sections() -> Vec<NarrativeSection> {
    [
        (SectionSlot::Background, "Study Background", BACKGROUND),
        (SectionSlot::Methods, "Methods", METHODS),
        (SectionSlot::Results, "Results", RESULTS),
    ]
    .into_iter()
    .map(|(slot, heading, body)| NarrativeSection {
        slot,
        heading: heading.to_string(),
        body: body.to_string(),
    })
    .collect()
}

impl DashboardConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        info!(path = %path.display(), sections = config.sections.len(), "loaded dashboard config");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds.validate()?;

        let baseline = self.labels.baseline.trim();
        let treatment = self.labels.treatment.trim();
        if baseline.is_empty() || treatment.is_empty() {
            return Err(ConfigError::Invalid("day labels must not be empty".to_string()));
        }
        if baseline == treatment {
            return Err(ConfigError::Invalid(format!(
                "baseline and treatment day labels must differ, both are '{baseline}'"
            )));
        }
        Ok(())
    }

    pub fn section(&self, slot: SectionSlot) -> Option<&NarrativeSection> {
        self.sections.iter().find(|section| section.slot == slot)
    }
}
