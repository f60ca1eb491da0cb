//! Gene fusions.

use super::{Kind, SortOrder, VariantCategory};
use crate::report::{
    conf::PanelConfig,
    rules::{Condition, TierRule},
    schema::Col,
    tier::Tier,
};

/// Columns of the fusion call table.
pub const CALL_COLUMNS: &[Col] = &[
    Col::Tier,
    Col::Filter,
    Col::Call,
    Col::RowType,
    Col::Id,
    Col::Chromosome,
    Col::Gene,
    Col::Alteration,
    Col::Position,
    Col::TotalRead,
    Col::Annotation,
    Col::ExonNumber,
    Col::OncomineGeneClass,
    Col::Hotspot,
    Col::FailReason,
    Col::ClinicalSignificance,
];

const FUSION_ROW_TYPES: &[&str] = &["Fusion", "RNAExonVariant"];

/// Build the fusion category from the panel configuration.
pub fn category(conf: &PanelConfig) -> VariantCategory {
    VariantCategory {
        kind: Kind::Fusion,
        call_when: Condition::All(vec![
            Condition::equals(Col::Call, "POS"),
            Condition::one_of(Col::RowType, FUSION_ROW_TYPES),
        ]),
        nocall_when: Condition::All(vec![
            Condition::equals(Col::Filter, "FAIL"),
            Condition::one_of(Col::RowType, FUSION_ROW_TYPES),
        ]),
        call_columns: CALL_COLUMNS.to_vec(),
        nocall_columns: CALL_COLUMNS
            .iter()
            .copied()
            .filter(|c| *c != Col::Tier)
            .collect(),
        drop_when: None,
        rules: vec![TierRule::new(
            "fusion-partner",
            Condition::StartsWithAny(Col::Gene, conf.fusion_gene_prefixes.clone()),
            Tier::Tier1And2,
        )],
        sort: SortOrder::TotalReadThenTier,
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::category;
    use crate::report::{conf::PanelConfig, schema::VariantRow, tier::Tier};

    fn breakpoint(index: usize, gene: &str, total_read: i64) -> VariantRow {
        VariantRow {
            index,
            gene: Some(gene.to_string()),
            total_read: Some(total_read),
            call: Some(String::from("POS")),
            row_type: Some(String::from("Fusion")),
            ..Default::default()
        }
    }

    #[test]
    fn empty_input() {
        let tables = category(&PanelConfig::default()).process(&[], None);

        assert!(tables.call.is_empty());
        assert!(tables.nocall.is_empty());
        assert_eq!(tables.call_columns.len(), 16);
    }

    #[test]
    fn tiers_and_order() {
        let rows = vec![
            breakpoint(0, "EML4", 85),
            breakpoint(1, "ALK", 85),
            breakpoint(2, "KIF5B", 120),
            breakpoint(3, "RET", 120),
        ];

        let tables = category(&PanelConfig::default()).process(&rows, None);

        assert_eq!(
            tables
                .call
                .iter()
                .map(|c| (c.variant.index, c.tier))
                .collect::<Vec<_>>(),
            vec![
                (3, Tier::Tier1And2),
                (2, Tier::NotApplicable),
                (1, Tier::Tier1And2),
                (0, Tier::NotApplicable),
            ]
        );
    }

    #[test]
    fn failed_fusions_are_nocalls() {
        let rows = vec![
            VariantRow {
                call: Some(String::from("NOCALL")),
                filter: Some(String::from("FAIL")),
                ..breakpoint(0, "ROS1", 3)
            },
            VariantRow {
                call: Some(String::from("NOCALL")),
                filter: Some(String::from("FAIL")),
                row_type: Some(String::from("snp")),
                ..breakpoint(1, "KRAS", 3)
            },
        ];

        let (call, nocall) = category(&PanelConfig::default()).partition(&rows);

        assert!(call.is_empty());
        assert_eq!(nocall.iter().map(|r| r.index).collect::<Vec<_>>(), vec![0]);
    }
}
