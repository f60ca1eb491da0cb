//! Copy number variants and loss of heterozygosity.

use super::{Kind, SortOrder, VariantCategory};
use crate::report::{
    conf::PanelConfig,
    rules::{Condition, TierRule},
    schema::Col,
    tier::Tier,
};

/// Columns of the CNV call table.
pub const CALL_COLUMNS: &[Col] = &[
    Col::GeneName,
    Col::CopyNumber,
    Col::Tier,
    Col::RowType,
    Col::Call,
    Col::Chromosome,
    Col::Position,
    Col::Id,
    Col::Quality,
    Col::Filter,
    Col::Mapd,
    Col::Ci,
    Col::Length,
    Col::EndPosition,
    Col::OncomineGeneClass,
    Col::Hotspot,
    Col::FailReason,
    Col::ClinicalSignificance,
];

/// Build the CNV category from the panel configuration.
pub fn category(conf: &PanelConfig) -> VariantCategory {
    let amp = Condition::equals(Col::Call, "AMP");
    let call_when = Condition::All(vec![
        Condition::Any(vec![
            Condition::one_of(Col::Call, &["DEL", "AMP"]),
            Condition::equals(Col::RowType, "LOH"),
        ]),
        Condition::Present(Col::GeneName),
    ]);
    let nocall_when = Condition::All(vec![
        Condition::equals(Col::Call, "NOCALL"),
        Condition::one_of(Col::RowType, &["CNV", "LOH"]),
    ]);
    let drop_when = Condition::All(vec![
        amp.clone(),
        Condition::Below(Col::CopyNumber, conf.min_amp_copy_number),
    ]);
    let rules = vec![TierRule::new(
        "amplified-oncogene",
        Condition::All(vec![
            amp,
            Condition::In(Col::GeneName, conf.cnv_oncogenes.clone()),
        ]),
        Tier::Tier1And2,
    )];

    VariantCategory {
        kind: Kind::Cnv,
        call_when,
        nocall_when,
        call_columns: CALL_COLUMNS.to_vec(),
        nocall_columns: CALL_COLUMNS
            .iter()
            .copied()
            .filter(|c| *c != Col::Tier)
            .collect(),
        drop_when: Some(drop_when),
        rules,
        sort: SortOrder::Tier,
    }
}
