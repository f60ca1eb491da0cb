//! Panel configuration: gene lists and thresholds driving the tier rules.
//!
//! All values have compiled-in defaults for the Oncomine panel; a JSON file
//! may override any subset of them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::tier::Tier;

/// Total depth below which an SNV call is considered low-confidence.
pub const MIN_TOTAL_DEPTH: i64 = 100;

/// Minimal copy number for an amplification to be reported.
pub const MIN_AMP_COPY_NUMBER: f64 = 4.0;

/// Fusion read support below which a low-read note is added to the report.
pub const LOW_FUSION_READS: i64 = 500;

/// Genes whose amplification is tier I/II.
pub const CNV_ONCOGENES: &[&str] = &[
    "AKT1", "ALK", "BRAF", "CCND2", "CCNE1", "CD274", "CDK4", "CDK6", "DDR1", "DDR2", "EGFR",
    "EMSY", "ERBB2", "FGF23", "FGF3", "FGF4", "FGF19", "CCND1", "FGF9", "FGFR1", "FGFR2", "FGFR4",
    "GNAS", "KRAS", "MAP2K1", "MCL1", "MDM2", "MET", "MYC", "NTRK1", "PIK3CA", "PTPN11", "RAF1",
    "RICTOR", "ROS1", "SRC",
];

/// Gene prefixes whose fusions are tier I/II.
pub const FUSION_GENE_PREFIXES: &[&str] = &[
    "ALK", "BRAF", "MET", "ESR1", "EGFR", "ETV6", "NTRK3", "FLI1", "FGFR", "FGFR3", "NTRK2", "NRG1",
    "PAX8", "RAF1", "RELA", "RET", "PIK3CA",
];

/// A fixed tier for one gene and protein change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantException {
    pub gene: String,
    pub aa_change: String,
    pub tier: Tier,
}

/// Protein change pattern that makes a call tier I/II.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionablePattern {
    pub gene: String,
    /// Regular expression matched against the amino acid change.
    pub aa_pattern: String,
}

/// Coding change pattern of a known sequencing artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactPattern {
    pub gene: String,
    /// Regular expression matched against the nucleotide change.
    pub nucleotide_pattern: String,
    /// Minimal length of the nucleotide change string.
    pub min_len: usize,
}

/// Configuration of the panel-specific rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Total depth below which SNV calls drop to tier IV.
    pub min_total_depth: i64,
    /// Minimal copy number of reported amplifications.
    pub min_amp_copy_number: f64,
    /// Fusion read support below which the report carries a low-read note.
    pub low_fusion_reads: i64,
    /// Amplified genes that are tier I/II.
    pub cnv_oncogenes: Vec<String>,
    /// Fusion gene prefixes that are tier I/II.
    pub fusion_gene_prefixes: Vec<String>,
    /// Variants with a fixed tier, e.g., pharmacogenomic markers.
    pub variant_exceptions: Vec<VariantException>,
    /// Protein change patterns that are tier I/II.
    pub actionable_patterns: Vec<ActionablePattern>,
    /// Coding change patterns of known artifacts.
    pub artifact_patterns: Vec<ArtifactPattern>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            min_total_depth: MIN_TOTAL_DEPTH,
            min_amp_copy_number: MIN_AMP_COPY_NUMBER,
            low_fusion_reads: LOW_FUSION_READS,
            cnv_oncogenes: CNV_ONCOGENES.iter().map(|s| s.to_string()).collect(),
            fusion_gene_prefixes: FUSION_GENE_PREFIXES.iter().map(|s| s.to_string()).collect(),
            variant_exceptions: vec![VariantException {
                gene: String::from("UGT1A1"),
                aa_change: String::from("p.Gly71Arg"),
                tier: Tier::Tier3,
            }],
            // EGFR exon 19 spans codons 729-761.
            actionable_patterns: vec![ActionablePattern {
                gene: String::from("EGFR"),
                aa_pattern: String::from(r"^p\.[A-Z][a-z]{2}7(29|[3-5][0-9]|6[01])_[A-Z][a-z]{2}[0-9]+del"),
            }],
            artifact_patterns: vec![ArtifactPattern {
                gene: String::from("RNF43"),
                nucleotide_pattern: String::from(r"^c\.1976del"),
                min_len: 10,
            }],
        }
    }
}

impl PanelConfig {
    /// Load from JSON file, missing keys take their default values.
    pub fn from_path(path: &Path) -> Result<Self, anyhow::Error> {
        let reader = std::fs::File::open(path)
            .map_err(|e| anyhow::anyhow!("could not open panel config {:?}: {}", path, e))?;
        let conf: Self = serde_json::from_reader(std::io::BufReader::new(reader))
            .map_err(|e| anyhow::anyhow!("could not parse panel config {:?}: {}", path, e))?;
        Ok(conf)
    }
}
