//! Extraction of the significant gene list.

use indexmap::IndexSet;

use super::shaped::ShapedTables;

/// Genes and fusions of tier I/II.
///
/// SNV genes come first, then amplified genes not seen before, then the
/// distinct `GeneA-GeneB fusion` labels.
pub fn significant_genes(shaped: &ShapedTables) -> Vec<String> {
    let genes = shaped
        .mutations
        .iter()
        .filter(|r| r.tier.is_significant())
        .filter_map(|r| r.gene.clone())
        .chain(
            shaped
                .amplifications
                .iter()
                .filter(|r| r.tier.is_significant())
                .filter_map(|r| r.gene.clone()),
        )
        .collect::<IndexSet<_>>();
    let fusions = shaped
        .fusions
        .iter()
        .filter(|r| r.tier.is_significant())
        .map(|r| {
            format!(
                "{}-{} fusion",
                r.gene_a.as_deref().unwrap_or_default(),
                r.gene_b.as_deref().unwrap_or_default()
            )
        })
        .collect::<IndexSet<_>>();

    genes.into_iter().chain(fusions).collect()
}
