//! Canonical column schema and normalization of raw Oncomine tables.

use std::{collections::HashMap, io::Read, path::Path};

use strum::{EnumCount, IntoEnumIterator};

use super::tier::Tier;
use crate::{common::open_read_maybe_gz, err::ReportError};

/// Canonical columns used everywhere downstream of the normalizer.
#[derive(
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Clone,
    Copy,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::EnumCount,
)]
pub enum Col {
    #[strum(serialize = "Gene_name")]
    GeneName,
    #[strum(serialize = "Gene")]
    Gene,
    #[strum(serialize = "AA_Change")]
    AaChange,
    #[strum(serialize = "Nucleotide_change")]
    NucleotideChange,
    #[strum(serialize = "VAF")]
    Vaf,
    #[strum(serialize = "Total_depth")]
    TotalDepth,
    #[strum(serialize = "Variant_count")]
    VariantCount,
    #[strum(serialize = "RefSeq")]
    RefSeq,
    #[strum(serialize = "mutation_type")]
    MutationType,
    #[strum(serialize = "Oncomine_gene_class")]
    OncomineGeneClass,
    #[strum(serialize = "Hotspot")]
    Hotspot,
    #[strum(serialize = "Location")]
    Location,
    #[strum(serialize = "rowtype")]
    RowType,
    #[strum(serialize = "COSM_ID")]
    CosmId,
    #[strum(serialize = "RefSNP_id")]
    RefSnpId,
    #[strum(serialize = "RefSNP_stat")]
    RefSnpStat,
    #[strum(serialize = "Clinical_significance")]
    ClinicalSignificance,
    #[strum(serialize = "SIFT_score")]
    SiftScore,
    #[strum(serialize = "PolyPhen_score")]
    PolyphenScore,
    #[strum(serialize = "Grantham_score")]
    GranthamScore,
    #[strum(serialize = "Fail_reason")]
    FailReason,
    #[strum(serialize = "Chromosome")]
    Chromosome,
    #[strum(serialize = "Position")]
    Position,
    #[strum(serialize = "End_position")]
    EndPosition,
    #[strum(serialize = "Copy_number")]
    CopyNumber,
    #[strum(serialize = "Call")]
    Call,
    #[strum(serialize = "CI")]
    Ci,
    #[strum(serialize = "ID")]
    Id,
    #[strum(serialize = "Length")]
    Length,
    #[strum(serialize = "Quality")]
    Quality,
    #[strum(serialize = "MAPD")]
    Mapd,
    #[strum(serialize = "Alteration")]
    Alteration,
    #[strum(serialize = "Total_Read")]
    TotalRead,
    #[strum(serialize = "Exon_number")]
    ExonNumber,
    #[strum(serialize = "Annotation")]
    Annotation,
    #[strum(serialize = "Filter")]
    Filter,
    #[strum(serialize = "Tier")]
    Tier,
}

/// Raw Oncomine column names, in the order of the canonical columns.
pub const RAW_COLUMNS: &[(&str, Col)] = &[
    ("FUNC1.gene", Col::GeneName),
    ("INFO.1.GENE_NAME", Col::Gene),
    ("FUNC1.protein", Col::AaChange),
    ("FUNC1.coding", Col::NucleotideChange),
    ("INFO.A.AF", Col::Vaf),
    ("INFO.1.FDP", Col::TotalDepth),
    ("INFO.A.FAO", Col::VariantCount),
    ("FUNC1.transcript", Col::RefSeq),
    ("FUNC1.function", Col::MutationType),
    ("FUNC1.oncomineGeneClass", Col::OncomineGeneClass),
    ("FUNC1.oncomineVariantClass", Col::Hotspot),
    ("FUNC1.location", Col::Location),
    ("rowtype", Col::RowType),
    ("INFO...OID", Col::CosmId),
    ("FUNC1.CLNID1", Col::RefSnpId),
    ("FUNC1.CLNREVSTAT1", Col::RefSnpStat),
    ("FUNC1.CLNSIG1", Col::ClinicalSignificance),
    ("FUNC1.sift", Col::SiftScore),
    ("FUNC1.polyphen", Col::PolyphenScore),
    ("FUNC1.grantham", Col::GranthamScore),
    ("INFO.1.FAIL_REASON", Col::FailReason),
    ("CHROM", Col::Chromosome),
    ("POS", Col::Position),
    ("INFO.1.END", Col::EndPosition),
    ("FORMAT.1.CN", Col::CopyNumber),
    ("call", Col::Call),
    ("INFO...CI", Col::Ci),
    ("ID", Col::Id),
    ("INFO...LEN", Col::Length),
    ("QUAL", Col::Quality),
    ("INFO...CDF_MAPD", Col::Mapd),
    ("ALT", Col::Alteration),
    ("INFO...READ_COUNT", Col::TotalRead),
    ("INFO.1.EXON_NUM", Col::ExonNumber),
    ("INFO.1.ANNOTATION", Col::Annotation),
    ("FILTER", Col::Filter),
    ("Tier", Col::Tier),
];

/// Name of the raw index column.
pub const INDEX_COLUMN: &str = "vcf.rownum";

/// One record of the normalized variant table.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VariantRow {
    /// Row index from `vcf.rownum`, or the 0-based line number if absent.
    pub index: usize,
    /// HGNC symbol of the affected gene
    pub gene_name: Option<String>,
    /// Gene as given in the INFO field, used for fusions
    pub gene: Option<String>,
    /// HGVS protein change
    pub aa_change: Option<String>,
    /// HGVS coding change
    pub nucleotide_change: Option<String>,
    /// Variant allele frequency, as a fraction
    pub vaf: Option<f64>,
    /// Total (flow) depth
    pub total_depth: Option<i64>,
    /// Number of reads supporting the variant
    pub variant_count: Option<i64>,
    pub refseq: Option<String>,
    pub mutation_type: Option<String>,
    pub oncomine_gene_class: Option<String>,
    /// Oncomine variant class, e.g., "Hotspot" or "Deleterious"
    pub hotspot: Option<String>,
    pub location: Option<String>,
    pub row_type: Option<String>,
    pub cosm_id: Option<String>,
    pub refsnp_id: Option<String>,
    pub refsnp_stat: Option<String>,
    pub clinical_significance: Option<String>,
    pub sift_score: Option<String>,
    pub polyphen_score: Option<String>,
    pub grantham_score: Option<String>,
    pub fail_reason: Option<String>,
    pub chromosome: Option<String>,
    /// 1-based position
    pub position: Option<i64>,
    pub end_position: Option<String>,
    /// Estimated copy number
    pub copy_number: Option<f64>,
    /// Call status, e.g., "POS", "NOCALL", "AMP", "DEL"
    pub call: Option<String>,
    pub ci: Option<String>,
    pub id: Option<String>,
    pub length: Option<String>,
    pub quality: Option<String>,
    pub mapd: Option<String>,
    pub alteration: Option<String>,
    /// Number of reads supporting a fusion
    pub total_read: Option<i64>,
    pub exon_number: Option<String>,
    pub annotation: Option<String>,
    pub filter: Option<String>,
    /// Tier as given in the input, if any
    pub tier: Option<Tier>,
}

impl VariantRow {
    /// Return the textual value of the column, `None` if missing.
    pub fn text(&self, col: Col) -> Option<String> {
        match col {
            Col::GeneName => self.gene_name.clone(),
            Col::Gene => self.gene.clone(),
            Col::AaChange => self.aa_change.clone(),
            Col::NucleotideChange => self.nucleotide_change.clone(),
            Col::Vaf => self.vaf.map(|v| v.to_string()),
            Col::TotalDepth => self.total_depth.map(|v| v.to_string()),
            Col::VariantCount => self.variant_count.map(|v| v.to_string()),
            Col::RefSeq => self.refseq.clone(),
            Col::MutationType => self.mutation_type.clone(),
            Col::OncomineGeneClass => self.oncomine_gene_class.clone(),
            Col::Hotspot => self.hotspot.clone(),
            Col::Location => self.location.clone(),
            Col::RowType => self.row_type.clone(),
            Col::CosmId => self.cosm_id.clone(),
            Col::RefSnpId => self.refsnp_id.clone(),
            Col::RefSnpStat => self.refsnp_stat.clone(),
            Col::ClinicalSignificance => self.clinical_significance.clone(),
            Col::SiftScore => self.sift_score.clone(),
            Col::PolyphenScore => self.polyphen_score.clone(),
            Col::GranthamScore => self.grantham_score.clone(),
            Col::FailReason => self.fail_reason.clone(),
            Col::Chromosome => self.chromosome.clone(),
            Col::Position => self.position.map(|v| v.to_string()),
            Col::EndPosition => self.end_position.clone(),
            Col::CopyNumber => self.copy_number.map(|v| v.to_string()),
            Col::Call => self.call.clone(),
            Col::Ci => self.ci.clone(),
            Col::Id => self.id.clone(),
            Col::Length => self.length.clone(),
            Col::Quality => self.quality.clone(),
            Col::Mapd => self.mapd.clone(),
            Col::Alteration => self.alteration.clone(),
            Col::TotalRead => self.total_read.map(|v| v.to_string()),
            Col::ExonNumber => self.exon_number.clone(),
            Col::Annotation => self.annotation.clone(),
            Col::Filter => self.filter.clone(),
            Col::Tier => self.tier.map(|t| t.to_string()),
        }
    }

    /// Return the numeric value of the column, `None` if missing or textual.
    pub fn number(&self, col: Col) -> Option<f64> {
        match col {
            Col::Vaf => self.vaf,
            Col::CopyNumber => self.copy_number,
            Col::TotalDepth => self.total_depth.map(|v| v as f64),
            Col::VariantCount => self.variant_count.map(|v| v as f64),
            Col::Position => self.position.map(|v| v as f64),
            Col::TotalRead => self.total_read.map(|v| v as f64),
            _ => None,
        }
    }
}

/// Raw table as read from the instrument output, before normalization.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// Column names from the header line.
    pub headers: Vec<String>,
    /// Row values, one entry per header.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Read a tab-separated table, skipping `#` comment lines.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, anyhow::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .comment(Some(b'#'))
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);
        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.to_string())
            .collect::<Vec<_>>();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(|v| v.to_string()).collect());
        }
        Ok(Self { headers, rows })
    }

    /// Read a (possibly gzip-compressed) table from `path`.
    #[tracing::instrument]
    pub fn from_path(path: &Path) -> Result<Self, anyhow::Error> {
        let reader = open_read_maybe_gz(path)?;
        let table = Self::from_reader(reader)
            .map_err(|e| anyhow::anyhow!("could not read table {:?}: {}", path, e))?;
        tracing::debug!(
            "read {} rows with {} columns",
            table.rows.len(),
            table.headers.len()
        );
        Ok(table)
    }
}

/// Mapping from raw instrument columns onto the canonical columns.
#[derive(Debug, Clone)]
pub struct SchemaNormalizer {
    mapping: Vec<(String, Col)>,
}

impl SchemaNormalizer {
    /// Construct from an explicit mapping; every canonical column must be mapped once.
    pub fn new(mapping: &[(&str, Col)]) -> Result<Self, ReportError> {
        if mapping.len() != Col::COUNT {
            return Err(ReportError::SchemaFault {
                expected: Col::COUNT,
                actual: mapping.len(),
            });
        }
        for col in Col::iter() {
            let count = mapping.iter().filter(|(_, c)| *c == col).count();
            if count != 1 {
                return Err(ReportError::SchemaDuplicate {
                    column: col.to_string(),
                    count,
                });
            }
        }
        Ok(Self {
            mapping: mapping
                .iter()
                .map(|(raw, col)| (raw.to_string(), *col))
                .collect(),
        })
    }

    /// The normalizer for the Oncomine `*-oncomine.tsv` output.
    pub fn oncomine() -> Result<Self, ReportError> {
        Self::new(RAW_COLUMNS)
    }

    /// Normalize all rows of `raw` into `VariantRow` records.
    pub fn normalize(&self, raw: &RawTable) -> Result<Vec<VariantRow>, ReportError> {
        let header_idx = raw
            .headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.as_str(), i))
            .collect::<HashMap<_, _>>();
        let positions = self
            .mapping
            .iter()
            .map(|(raw_name, col)| {
                let pos = header_idx.get(raw_name.as_str()).copied();
                if pos.is_none() {
                    tracing::debug!("raw column {} missing, {} will be empty", raw_name, col);
                }
                (*col, pos)
            })
            .collect::<HashMap<_, _>>();
        let index_pos = header_idx.get(INDEX_COLUMN).copied();

        raw.rows
            .iter()
            .enumerate()
            .map(|(line_no, values)| {
                let cell = |col: Col| {
                    positions
                        .get(&col)
                        .copied()
                        .flatten()
                        .and_then(|pos| values.get(pos))
                        .map(|v| v.trim())
                        .filter(|v| !v.is_empty() && *v != ".")
                };
                let index = match index_pos.and_then(|pos| values.get(pos)) {
                    Some(value) => parse_index(value, line_no)?,
                    None => line_no,
                };
                build_row(index, &cell)
            })
            .collect()
    }
}

/// Build one `VariantRow` from the canonical cell accessor.
fn build_row<'a, F>(index: usize, cell: &F) -> Result<VariantRow, ReportError>
where
    F: Fn(Col) -> Option<&'a str>,
{
    let text = |col: Col| cell(col).map(|v| v.to_string());
    let int = |col: Col| -> Result<Option<i64>, ReportError> {
        cell(col)
            .map(|v| parse_int(v, index, &col.to_string()))
            .transpose()
    };
    let float = |col: Col| -> Result<Option<f64>, ReportError> {
        cell(col)
            .map(|v| parse_float(v, index, &col.to_string()))
            .transpose()
    };

    Ok(VariantRow {
        index,
        gene_name: text(Col::GeneName),
        gene: text(Col::Gene),
        aa_change: text(Col::AaChange),
        nucleotide_change: text(Col::NucleotideChange),
        vaf: float(Col::Vaf)?,
        total_depth: int(Col::TotalDepth)?,
        variant_count: int(Col::VariantCount)?,
        refseq: text(Col::RefSeq),
        mutation_type: text(Col::MutationType),
        oncomine_gene_class: text(Col::OncomineGeneClass),
        hotspot: text(Col::Hotspot),
        location: text(Col::Location),
        row_type: text(Col::RowType),
        cosm_id: text(Col::CosmId),
        refsnp_id: text(Col::RefSnpId),
        refsnp_stat: text(Col::RefSnpStat),
        clinical_significance: text(Col::ClinicalSignificance),
        sift_score: text(Col::SiftScore),
        polyphen_score: text(Col::PolyphenScore),
        grantham_score: text(Col::GranthamScore),
        fail_reason: text(Col::FailReason),
        chromosome: text(Col::Chromosome),
        position: int(Col::Position)?,
        end_position: text(Col::EndPosition),
        copy_number: float(Col::CopyNumber)?,
        call: text(Col::Call),
        ci: text(Col::Ci),
        id: text(Col::Id),
        length: text(Col::Length),
        quality: text(Col::Quality),
        mapd: text(Col::Mapd),
        alteration: text(Col::Alteration),
        total_read: int(Col::TotalRead)?,
        exon_number: text(Col::ExonNumber),
        annotation: text(Col::Annotation),
        filter: text(Col::Filter),
        tier: cell(Col::Tier).and_then(|v| v.parse::<Tier>().ok()),
    })
}

fn parse_float(value: &str, row: usize, column: &str) -> Result<f64, ReportError> {
    value.parse::<f64>().map_err(|_| ReportError::InvalidValue {
        row,
        column: column.to_string(),
        value: value.to_string(),
    })
}

/// Parse a `vcf.rownum` value; negative indices are invalid.
fn parse_index(value: &str, row: usize) -> Result<usize, ReportError> {
    usize::try_from(parse_int(value, row, INDEX_COLUMN)?).map_err(|_| {
        ReportError::InvalidValue {
            row,
            column: INDEX_COLUMN.to_string(),
            value: value.to_string(),
        }
    })
}

/// Parse an integer, also accepting integral decimals such as `120.0`.
fn parse_int(value: &str, row: usize, column: &str) -> Result<i64, ReportError> {
    if let Ok(v) = value.parse::<i64>() {
        return Ok(v);
    }
    match value.parse::<f64>() {
        Ok(v) if v.fract() == 0.0 && v.is_finite() => Ok(v as i64),
        _ => Err(ReportError::InvalidValue {
            row,
            column: column.to_string(),
            value: value.to_string(),
        }),
    }
}
