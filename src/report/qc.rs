//! Sample and sequencing quality summary.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Minimal number of mapped reads for a passing factor.
pub const MIN_MAPPED_READS: u64 = 5_000_000;
/// Minimal on-target percentage for a passing factor.
pub const MIN_ON_TARGET: f64 = 90.0;
/// Minimal mean depth for a passing factor.
pub const MIN_MEAN_DEPTH: f64 = 1200.0;
/// Minimal uniformity percentage for a passing factor.
pub const MIN_UNIFORMITY: f64 = 90.0;
/// MAPD above which the sample is considered poor.
pub const MAX_FAIR_MAPD: f64 = 0.5;

pub const MAPD_POOR_NOTE: &str =
    "Note) The LOH score cannot be calculated because of poor sample quality (MAPD > 0.5).";
pub const MAPD_FAIR_NOTE: &str =
    "Note) The LOH score cannot be calculated because of poor sample quality (MAPD ≒ 0.5).";
pub const UNIFORMITY_POOR_NOTE: &str = "Note) Sequencing quality is low and reliability is \
     reduced (uniformity < 90%); clinical application requires caution.";

/// Coverage metrics of the sequencing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageMetrics {
    pub mapped_reads: u64,
    /// Percentage of reads on target.
    pub on_target: f64,
    pub mean_depth: f64,
    /// Percentage of amplicons with uniform coverage.
    pub uniformity: f64,
}

/// Genomic metrics of the sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenomicMetrics {
    /// Tumor cellularity in percent, as reported.
    pub cellularity: String,
    /// Mutations per megabase, as reported.
    pub tumor_mutational_burden: String,
    pub msi_score: f64,
    pub msi_status: String,
    /// Percent LOH; `NA` or missing when not computable.
    #[serde(default)]
    pub percent_loh: Option<String>,
    pub mapd: f64,
    #[serde(default)]
    pub genomic_instability_metric: Option<String>,
    #[serde(default)]
    pub genomic_instability_status: Option<String>,
}

/// Metrics of one case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub coverage: CoverageMetrics,
    pub genomic: GenomicMetrics,
}

impl Metrics {
    /// Load from JSON file.
    pub fn from_path(path: &Path) -> Result<Self, anyhow::Error> {
        let reader = std::fs::File::open(path)
            .map_err(|e| anyhow::anyhow!("could not open metrics {:?}: {}", path, e))?;
        serde_json::from_reader(std::io::BufReader::new(reader))
            .map_err(|e| anyhow::anyhow!("could not parse metrics {:?}: {}", path, e))
    }
}

/// Overall sequencing quality from the number of passing factors.
#[derive(
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Debug,
    Clone,
    Copy,
    strum::Display,
    strum::EnumString,
)]
pub enum QualityScore {
    #[serde(rename = "Very Good")]
    #[strum(serialize = "Very Good")]
    VeryGood,
    #[serde(rename = "Good")]
    #[strum(serialize = "Good")]
    Good,
    #[serde(rename = "Intermediate")]
    #[strum(serialize = "Intermediate")]
    Intermediate,
    #[serde(rename = "Poor")]
    #[strum(serialize = "Poor")]
    Poor,
}

impl QualityScore {
    pub fn from_passed(passed: usize) -> Self {
        match passed {
            passed if passed >= 4 => QualityScore::VeryGood,
            3 => QualityScore::Good,
            2 => QualityScore::Intermediate,
            _ => QualityScore::Poor,
        }
    }
}

/// Display values of the quality summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QcSummary {
    pub cellularity: String,
    pub tumor_mutational_burden: String,
    pub msi_score: String,
    pub msi_status: String,
    pub loh: String,
    pub loh_note: Option<String>,
    pub genomic_instability_metric: Option<String>,
    pub genomic_instability_status: Option<String>,
    pub mean_depth: String,
    pub on_target: String,
    pub total_quality_score: QualityScore,
    pub overall_result: String,
    pub qc_note: Option<String>,
}

/// Number of coverage factors that pass their threshold.
pub fn passed_factors(coverage: &CoverageMetrics) -> usize {
    [
        coverage.mapped_reads >= MIN_MAPPED_READS,
        coverage.on_target >= MIN_ON_TARGET,
        coverage.mean_depth >= MIN_MEAN_DEPTH,
        coverage.uniformity >= MIN_UNIFORMITY,
    ]
    .iter()
    .filter(|passed| **passed)
    .count()
}

/// LOH display value and note.
fn loh_display(genomic: &GenomicMetrics) -> Result<(String, Option<String>), anyhow::Error> {
    match genomic.percent_loh.as_deref().map(str::trim) {
        None | Some("NA") | Some("") => {
            let note = if genomic.mapd > MAX_FAIR_MAPD {
                MAPD_POOR_NOTE
            } else {
                MAPD_FAIR_NOTE
            };
            Ok((
                String::from("not available (see note)"),
                Some(note.to_string()),
            ))
        }
        Some(value) => {
            let parsed: f64 = value
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid percent LOH {:?}: {}", value, e))?;
            if parsed == 0.0 {
                Ok((String::from("0%"), None))
            } else {
                Ok((format!("{}%", value), None))
            }
        }
    }
}

/// Summarize the metrics for the report.
pub fn summarize(metrics: &Metrics) -> Result<QcSummary, anyhow::Error> {
    let coverage = &metrics.coverage;
    let genomic = &metrics.genomic;

    let passed = passed_factors(coverage);
    let total_quality_score = QualityScore::from_passed(passed);
    tracing::debug!(
        "{} of 4 quality factors passed: {}",
        passed,
        total_quality_score
    );
    let qc_note = (total_quality_score == QualityScore::Good
        && coverage.uniformity < MIN_UNIFORMITY)
        .then(|| UNIFORMITY_POOR_NOTE.to_string());
    let (loh, loh_note) = loh_display(genomic)?;

    Ok(QcSummary {
        cellularity: format!("{}%", genomic.cellularity),
        tumor_mutational_burden: genomic.tumor_mutational_burden.clone(),
        msi_score: format!("{:.2}", genomic.msi_score),
        msi_status: genomic.msi_status.clone(),
        loh,
        loh_note,
        genomic_instability_metric: genomic.genomic_instability_metric.clone(),
        genomic_instability_status: genomic.genomic_instability_status.clone(),
        mean_depth: coverage.mean_depth.to_string(),
        on_target: format!("{}%", coverage.on_target),
        total_quality_score,
        overall_result: String::from("Pass"),
        qc_note,
    })
}
