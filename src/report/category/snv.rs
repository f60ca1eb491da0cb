//! Single nucleotide variants and small indels.

use regex::Regex;

use super::{Kind, SortOrder, VariantCategory};
use crate::report::{
    conf::PanelConfig,
    rules::{Condition, TierRule},
    schema::Col,
    tier::Tier,
};

/// Columns of the SNV call table.
pub const CALL_COLUMNS: &[Col] = &[
    Col::GeneName,
    Col::AaChange,
    Col::NucleotideChange,
    Col::Vaf,
    Col::Tier,
    Col::RowType,
    Col::CosmId,
    Col::TotalDepth,
    Col::VariantCount,
    Col::ClinicalSignificance,
    Col::MutationType,
    Col::Location,
    Col::OncomineGeneClass,
    Col::Hotspot,
    Col::PolyphenScore,
    Col::SiftScore,
    Col::RefSeq,
    Col::RefSnpId,
    Col::RefSnpStat,
    Col::FailReason,
];

/// Build the SNV category from the panel configuration.
pub fn category(conf: &PanelConfig) -> Result<VariantCategory, anyhow::Error> {
    let call_when = Condition::All(vec![
        Condition::equals(Col::Call, "POS"),
        Condition::not(Condition::one_of(
            Col::Location,
            &["intronic", "utr_3", "utr_5"],
        )),
        Condition::one_of(
            Col::RowType,
            &["snp", "del", "ins", "complex", "mnp", "RNAExonTiles"],
        ),
        Condition::Present(Col::MutationType),
        Condition::not(Condition::equals(Col::MutationType, "synonymous")),
    ]);
    let nocall_when = Condition::All(vec![
        Condition::equals(Col::Call, "NOCALL"),
        Condition::not(Condition::one_of(Col::RowType, &["CNV", "Fusion"])),
    ]);

    Ok(VariantCategory {
        kind: Kind::Snv,
        call_when,
        nocall_when,
        call_columns: CALL_COLUMNS.to_vec(),
        nocall_columns: CALL_COLUMNS
            .iter()
            .copied()
            .filter(|c| *c != Col::Tier)
            .collect(),
        drop_when: None,
        rules: rules(conf)?,
        sort: SortOrder::Tier,
    })
}

/// SNV overrides, in cascade order.
fn rules(conf: &PanelConfig) -> Result<Vec<TierRule>, anyhow::Error> {
    let min_depth = conf.min_total_depth as f64;
    let mut rules = Vec::new();

    for exception in &conf.variant_exceptions {
        rules.push(TierRule::new(
            &format!("exception-{}", exception.gene),
            Condition::All(vec![
                Condition::equals(Col::GeneName, &exception.gene),
                Condition::equals(Col::AaChange, &exception.aa_change),
            ]),
            exception.tier,
        ));
    }

    rules.push(TierRule::new(
        "low-depth",
        Condition::Below(Col::TotalDepth, min_depth),
        Tier::Tier4,
    ));

    for pattern in &conf.actionable_patterns {
        let regex = Regex::new(&pattern.aa_pattern).map_err(|e| {
            anyhow::anyhow!("invalid pattern for {}: {}", pattern.gene, e)
        })?;
        rules.push(TierRule::new(
            &format!("actionable-{}", pattern.gene),
            Condition::All(vec![
                Condition::equals(Col::GeneName, &pattern.gene),
                Condition::Matches(Col::AaChange, regex),
                Condition::not(Condition::Below(Col::TotalDepth, min_depth)),
            ]),
            Tier::Tier1And2,
        ));
    }

    for pattern in &conf.artifact_patterns {
        let regex = Regex::new(&pattern.nucleotide_pattern).map_err(|e| {
            anyhow::anyhow!("invalid artifact pattern for {}: {}", pattern.gene, e)
        })?;
        rules.push(TierRule::new(
            &format!("artifact-{}", pattern.gene),
            Condition::All(vec![
                Condition::equals(Col::GeneName, &pattern.gene),
                Condition::Matches(Col::NucleotideChange, regex),
                Condition::MinLen(Col::NucleotideChange, pattern.min_len),
            ]),
            Tier::Blacklist,
        ));
    }

    rules.push(TierRule::new(
        "blacklist",
        Condition::Blacklisted,
        Tier::Blacklist,
    ));

    Ok(rules)
}
