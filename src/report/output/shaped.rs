//! Report-ready tables with display headers.

use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    err::ReportError,
    report::{
        category::{cmp_read_desc, Called, Categorized, CategoryTables},
        tier::Tier,
    },
};

/// Common interface of the shaped table rows, used for splitting and rendering.
pub trait ShapedRow {
    /// Display header, in column order.
    const HEADER: &'static [&'static str];

    /// Display cells, in column order.
    fn cells(&self) -> Vec<String>;

    /// Tier as displayed.
    fn tier(&self) -> Tier;

    /// Read support, only available for fusions.
    fn total_read(&self) -> Option<i64> {
        None
    }
}

/// One reported SNV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MutationRow {
    #[serde(rename = "Gene")]
    pub gene: Option<String>,
    #[serde(rename = "Amino acid change")]
    pub aa_change: Option<String>,
    #[serde(rename = "Nucleotide change")]
    pub nucleotide_change: Option<String>,
    #[serde(rename = "Variant allele frequency(%)")]
    pub vaf: Option<String>,
    #[serde(rename = "Tier")]
    pub tier: Tier,
}

impl ShapedRow for MutationRow {
    const HEADER: &'static [&'static str] = &[
        "Gene",
        "Amino acid change",
        "Nucleotide change",
        "Variant allele frequency(%)",
        "Tier",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.gene.clone().unwrap_or_default(),
            self.aa_change.clone().unwrap_or_default(),
            self.nucleotide_change.clone().unwrap_or_default(),
            self.vaf.clone().unwrap_or_default(),
            self.tier.to_string(),
        ]
    }

    fn tier(&self) -> Tier {
        self.tier
    }
}

/// One reported amplification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmplificationRow {
    #[serde(rename = "Gene")]
    pub gene: Option<String>,
    #[serde(rename = "Estimated copy number")]
    pub copy_number: Option<f64>,
    #[serde(rename = "Tier")]
    pub tier: Tier,
}

impl ShapedRow for AmplificationRow {
    const HEADER: &'static [&'static str] = &["Gene", "Estimated copy number", "Tier"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.gene.clone().unwrap_or_default(),
            self.copy_number.map(|v| v.to_string()).unwrap_or_default(),
            self.tier.to_string(),
        ]
    }

    fn tier(&self) -> Tier {
        self.tier
    }
}

/// One reported fusion, built from the two breakpoints sharing a read count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FusionRecord {
    #[serde(rename = "GeneA")]
    pub gene_a: Option<String>,
    #[serde(rename = "Chromosome:BreakpointA")]
    pub breakpoint_a: Option<String>,
    #[serde(rename = "GeneB")]
    pub gene_b: Option<String>,
    #[serde(rename = "Chromosome:BreakpointB")]
    pub breakpoint_b: Option<String>,
    #[serde(rename = "Total Read")]
    pub total_read: Option<i64>,
    #[serde(rename = "Tier")]
    pub tier: Tier,
}

impl ShapedRow for FusionRecord {
    const HEADER: &'static [&'static str] = &[
        "GeneA",
        "Chromosome:BreakpointA",
        "GeneB",
        "Chromosome:BreakpointB",
        "Total Read",
        "Tier",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.gene_a.clone().unwrap_or_default(),
            self.breakpoint_a.clone().unwrap_or_default(),
            self.gene_b.clone().unwrap_or_default(),
            self.breakpoint_b.clone().unwrap_or_default(),
            self.total_read.map(|v| v.to_string()).unwrap_or_default(),
            self.tier.to_string(),
        ]
    }

    fn tier(&self) -> Tier {
        self.tier
    }

    fn total_read(&self) -> Option<i64> {
        self.total_read
    }
}

/// The three shaped tables of one case.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShapedTables {
    #[serde(rename = "Mutation")]
    pub mutations: Vec<MutationRow>,
    #[serde(rename = "Amplification")]
    pub amplifications: Vec<AmplificationRow>,
    #[serde(rename = "Fusion")]
    pub fusions: Vec<FusionRecord>,
}

/// Render a variant allele fraction as percentage with one decimal.
pub fn format_vaf(vaf: f64) -> String {
    format!("{:.1}%", vaf * 100.0)
}

/// Calls that may appear in report output.
fn reportable(tables: &CategoryTables) -> impl Iterator<Item = &Called> {
    tables.call.iter().filter(|c| !c.tier.is_suppressed())
}

/// Shape the SNV calls.
pub fn mutations(tables: &CategoryTables) -> Vec<MutationRow> {
    reportable(tables)
        .map(|c| MutationRow {
            gene: c.variant.gene_name.clone(),
            aa_change: c.variant.aa_change.clone(),
            nucleotide_change: c.variant.nucleotide_change.clone(),
            vaf: c.variant.vaf.map(format_vaf),
            tier: c.tier.or_display_fallback(),
        })
        .collect()
}

/// Shape the CNV calls, keeping amplifications only.
pub fn amplifications(tables: &CategoryTables) -> Vec<AmplificationRow> {
    reportable(tables)
        .filter(|c| c.variant.call.as_deref() == Some("AMP"))
        .map(|c| AmplificationRow {
            gene: c.variant.gene_name.clone(),
            copy_number: c.variant.copy_number,
            tier: c.tier.or_display_fallback(),
        })
        .collect()
}

/// Pair the fusion breakpoints by total read count.
///
/// Every read count must be shared by exactly two breakpoints.  Member order
/// within a pair follows the order of the call table.
pub fn aggregate_fusions(tables: &CategoryTables) -> Result<Vec<FusionRecord>, ReportError> {
    let mut groups: IndexMap<Option<i64>, Vec<&Called>> = IndexMap::new();
    for called in reportable(tables) {
        groups
            .entry(called.variant.total_read)
            .or_default()
            .push(called);
    }

    let mut records = Vec::with_capacity(groups.len());
    for (total_read, members) in groups {
        let (a, b) = match members.as_slice() {
            [a, b] => (*a, *b),
            _ => {
                return Err(ReportError::AggregationFault {
                    total_read,
                    size: members.len(),
                })
            }
        };
        records.push(FusionRecord {
            gene_a: a.variant.gene.clone(),
            breakpoint_a: breakpoint(a),
            gene_b: b.variant.gene.clone(),
            breakpoint_b: breakpoint(b),
            total_read,
            tier: a.tier.min(b.tier),
        });
    }

    records.sort_by(|a, b| cmp_read_desc(a.total_read, b.total_read));
    records.sort_by_key(|r| r.tier);
    for record in records.iter_mut() {
        record.tier = record.tier.or_display_fallback();
    }
    tracing::debug!("aggregated {} fusions", records.len());

    Ok(records)
}

/// `chromosome:position` of a fusion breakpoint.
fn breakpoint(called: &Called) -> Option<String> {
    match (&called.variant.chromosome, called.variant.position) {
        (Some(chrom), Some(pos)) => Some(format!("{}:{}", chrom, pos)),
        _ => None,
    }
}

/// Shape all categories of a case.
pub fn shape(categorized: &Categorized) -> Result<ShapedTables, ReportError> {
    Ok(ShapedTables {
        mutations: mutations(&categorized.snv),
        amplifications: amplifications(&categorized.cnv),
        fusions: aggregate_fusions(&categorized.fusion)?,
    })
}
