//! Variant categories as data: predicates, projections, tier rules and sort order.
//!
//! SNV, CNV and fusion calls are processed by the same routine; only the
//! `VariantCategory` value differs between them.

pub mod cnv;
pub mod fusion;
pub mod snv;

use std::cmp::Ordering;

use super::{
    blacklist::Blacklist,
    rules::{assign_tier, default_rules, Condition, TierRule},
    schema::{Col, VariantRow},
    tier::Tier,
};

/// The three variant categories of the report.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy, strum::Display)]
pub enum Kind {
    /// Single nucleotide variants and small indels.
    #[strum(serialize = "SNV")]
    Snv,
    /// Copy number variants, including LOH.
    #[strum(serialize = "CNV")]
    Cnv,
    /// Gene fusions.
    #[strum(serialize = "Fusion")]
    Fusion,
}

/// Ordering of the call table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Most actionable tier first.
    Tier,
    /// Highest read support first, then most actionable tier.
    TotalReadThenTier,
}

/// Configuration of one variant category.
#[derive(Debug, Clone)]
pub struct VariantCategory {
    pub kind: Kind,
    /// Selects the rows that are calls of this category.
    pub call_when: Condition,
    /// Selects the rows that are no-calls of this category.
    pub nocall_when: Condition,
    /// Columns of the call table, including `Col::Tier`.
    pub call_columns: Vec<Col>,
    /// Columns of the no-call table.
    pub nocall_columns: Vec<Col>,
    /// Calls matching this condition are dropped before tiering.
    pub drop_when: Option<Condition>,
    /// Overrides applied after the default cascade, in order.
    pub rules: Vec<TierRule>,
    pub sort: SortOrder,
}

/// A call together with its assigned tier.
#[derive(Debug, Clone, PartialEq)]
pub struct Called {
    pub tier: Tier,
    pub variant: VariantRow,
}

/// Result of processing one category for one case.
#[derive(Debug, Clone)]
pub struct CategoryTables {
    pub kind: Kind,
    /// Tiered and sorted calls.
    pub call: Vec<Called>,
    /// No-calls, in input order.
    pub nocall: Vec<VariantRow>,
    pub call_columns: Vec<Col>,
    pub nocall_columns: Vec<Col>,
}

impl VariantCategory {
    /// Split `rows` into calls and no-calls.
    ///
    /// A row satisfying the call condition is never a no-call, which keeps
    /// the two subsets disjoint.
    pub fn partition(&self, rows: &[VariantRow]) -> (Vec<VariantRow>, Vec<VariantRow>) {
        let mut call = Vec::new();
        let mut nocall = Vec::new();
        for row in rows {
            if self.call_when.eval(row, None) {
                call.push(row.clone());
            } else if self.nocall_when.eval(row, None) {
                nocall.push(row.clone());
            }
        }
        (call, nocall)
    }

    /// Full cascade: default rules followed by the category overrides.
    pub fn cascade(&self) -> Vec<TierRule> {
        default_rules()
            .into_iter()
            .chain(self.rules.iter().cloned())
            .collect()
    }

    /// Partition, drop, tier and sort the rows of one case.
    pub fn process(&self, rows: &[VariantRow], blacklist: Option<&Blacklist>) -> CategoryTables {
        let (call, nocall) = self.partition(rows);
        tracing::debug!(
            "{}: {} calls, {} no-calls",
            self.kind,
            call.len(),
            nocall.len()
        );

        let call = match &self.drop_when {
            Some(drop_when) => call
                .into_iter()
                .filter(|row| {
                    let drop = drop_when.eval(row, blacklist);
                    if drop {
                        tracing::debug!("{}: dropping row {} before tiering", self.kind, row.index);
                    }
                    !drop
                })
                .collect(),
            None => call,
        };

        let mut called = if call.is_empty() {
            tracing::debug!("{}: no calls, skipping tier assignment", self.kind);
            Vec::new()
        } else {
            let cascade = self.cascade();
            call.into_iter()
                .map(|variant| Called {
                    tier: assign_tier(&variant, &cascade, blacklist),
                    variant,
                })
                .collect()
        };
        sort_calls(&mut called, self.sort);

        CategoryTables {
            kind: self.kind,
            call: called,
            nocall,
            call_columns: self.call_columns.clone(),
            nocall_columns: self.nocall_columns.clone(),
        }
    }
}

/// Stable sort of the tiered calls.
pub fn sort_calls(calls: &mut [Called], order: SortOrder) {
    match order {
        SortOrder::Tier => calls.sort_by_key(|c| c.tier),
        SortOrder::TotalReadThenTier => calls.sort_by(|a, b| {
            cmp_read_desc(a.variant.total_read, b.variant.total_read).then(a.tier.cmp(&b.tier))
        }),
    }
}

/// Descending order of read counts with missing values last.
pub fn cmp_read_desc(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Tables of all categories of one case.
#[derive(Debug, Clone)]
pub struct Categorized {
    pub snv: CategoryTables,
    pub cnv: CategoryTables,
    pub fusion: CategoryTables,
}

impl Categorized {
    /// Iterate over the tables in report order.
    pub fn tables(&self) -> [&CategoryTables; 3] {
        [&self.snv, &self.cnv, &self.fusion]
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::{sort_calls, Called, SortOrder};
    use crate::report::{conf::PanelConfig, schema::VariantRow, tier::Tier};

    fn row(call: &str, row_type: &str) -> VariantRow {
        VariantRow {
            call: Some(call.to_string()),
            row_type: Some(row_type.to_string()),
            ..Default::default()
        }
    }

    /// A mixed table including rows that match several raw predicates.
    fn mixed_rows() -> Vec<VariantRow> {
        let mut rows = vec![
            VariantRow {
                gene_name: Some(String::from("BRAF")),
                mutation_type: Some(String::from("missense")),
                location: Some(String::from("exonic")),
                ..row("POS", "snp")
            },
            row("NOCALL", "snp"),
            row("NOCALL", "CNV"),
            VariantRow {
                gene_name: Some(String::from("CDKN2A")),
                ..row("NOCALL", "LOH")
            },
            VariantRow {
                gene_name: Some(String::from("MET")),
                copy_number: Some(8.0),
                ..row("AMP", "CNV")
            },
            VariantRow {
                filter: Some(String::from("FAIL")),
                ..row("POS", "Fusion")
            },
            VariantRow {
                filter: Some(String::from("FAIL")),
                ..row("NOCALL", "RNAExonVariant")
            },
        ];
        for (i, row) in rows.iter_mut().enumerate() {
            row.index = i;
        }
        rows
    }

    #[test]
    fn call_and_nocall_are_disjoint() -> Result<(), anyhow::Error> {
        let conf = PanelConfig::default();
        let rows = mixed_rows();
        for category in [
            super::snv::category(&conf)?,
            super::cnv::category(&conf),
            super::fusion::category(&conf),
        ] {
            let (call, nocall) = category.partition(&rows);
            let call_idx = call.iter().map(|r| r.index).collect::<HashSet<_>>();
            let nocall_idx = nocall.iter().map(|r| r.index).collect::<HashSet<_>>();

            assert!(
                call_idx.is_disjoint(&nocall_idx),
                "{}: {:?} vs {:?}",
                category.kind,
                call_idx,
                nocall_idx
            );
        }

        Ok(())
    }

    #[test]
    fn tier_sort_is_stable() {
        let mut calls = [Tier::Tier4, Tier::Tier1And2, Tier::Tier4, Tier::NotApplicable]
            .iter()
            .enumerate()
            .map(|(i, tier)| Called {
                tier: *tier,
                variant: VariantRow {
                    index: i,
                    ..Default::default()
                },
            })
            .collect::<Vec<_>>();

        sort_calls(&mut calls, SortOrder::Tier);

        assert_eq!(
            calls.iter().map(|c| c.variant.index).collect::<Vec<_>>(),
            vec![1, 0, 2, 3]
        );
    }

    #[test]
    fn read_sort_puts_missing_last() {
        let mut calls = [
            (None, Tier::Tier1And2),
            (Some(85), Tier::Tier3),
            (Some(120), Tier::Tier3),
            (Some(120), Tier::Tier1And2),
        ]
        .iter()
        .enumerate()
        .map(|(i, (total_read, tier))| Called {
            tier: *tier,
            variant: VariantRow {
                index: i,
                total_read: *total_read,
                ..Default::default()
            },
        })
        .collect::<Vec<_>>();

        sort_calls(&mut calls, SortOrder::TotalReadThenTier);

        assert_eq!(
            calls.iter().map(|c| c.variant.index).collect::<Vec<_>>(),
            vec![3, 2, 1, 0]
        );
    }
}
