//! Report sections for the text template: significant and unknown parts of
//! each shaped table, rendered as plain-text tables.

use itertools::Itertools;
use serde::Serialize;

use super::shaped::{ShapedRow, ShapedTables};
use crate::report::tier::Tier;

/// Text shown below the header of an empty table.
pub const NOT_FOUND: &str = "Not Found";

/// Note attached to fusion tables with low read support.
pub const LOW_READ_NOTE: &str = "Note) The fusion read count is low and the call may be a false \
     positive; interpretation and clinical application require caution.";

/// One table section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    /// Number of rows in the table.
    pub count: usize,
    /// Plain-text rendering of the table.
    pub table: String,
    /// Optional note printed below the table.
    pub note: Option<String>,
}

/// Significant and unknown-significance parts of one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionPair {
    pub significant: Section,
    pub unknown: Section,
}

/// All sections of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSections {
    pub mutation: SectionPair,
    pub amplification: SectionPair,
    pub fusion: SectionPair,
    /// Comma-separated significant genes.
    pub significant_genes: String,
}

/// Build the sections from the shaped tables.
pub fn sections(
    shaped: &ShapedTables,
    significant_genes: &[String],
    low_fusion_reads: i64,
) -> ReportSections {
    ReportSections {
        mutation: section_pair(&shaped.mutations, None),
        amplification: section_pair(&shaped.amplifications, None),
        fusion: section_pair(&shaped.fusions, Some(low_fusion_reads)),
        significant_genes: significant_genes.iter().join(", "),
    }
}

/// Split `rows` by tier, order preserved, and render both parts.
fn section_pair<R: ShapedRow>(rows: &[R], low_reads: Option<i64>) -> SectionPair {
    let (significant, unknown): (Vec<&R>, Vec<&R>) =
        rows.iter().partition(|r| r.tier() <= Tier::TOP);
    SectionPair {
        significant: section(&significant, low_reads),
        unknown: section(&unknown, low_reads),
    }
}

fn section<R: ShapedRow>(rows: &[&R], low_reads: Option<i64>) -> Section {
    let has_low_read = low_reads
        .map(|threshold| {
            rows.iter()
                .any(|r| r.total_read().map(|v| v < threshold).unwrap_or(false))
        })
        .unwrap_or(false);
    Section {
        count: rows.len(),
        table: render_table(R::HEADER, &rows.iter().map(|r| r.cells()).collect_vec()),
        note: has_low_read.then(|| LOW_READ_NOTE.to_string()),
    }
}

/// Render a left-aligned table with a dashed rule below the header.
pub fn render_table(header: &[&str], rows: &[Vec<String>]) -> String {
    let widths = header
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or_default()
        })
        .collect_vec();
    let line = |cells: Vec<String>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = w))
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![
        line(header.iter().map(|h| h.to_string()).collect()),
        line(widths.iter().map(|w| "-".repeat(*w)).collect()),
    ];
    lines.extend(rows.iter().map(|row| line(row.clone())));
    if rows.is_empty() {
        lines.push(NOT_FOUND.to_string());
    }
    lines.join("\n")
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{render_table, sections, LOW_READ_NOTE};
    use crate::report::{
        output::shaped::{AmplificationRow, FusionRecord, ShapedTables},
        tier::Tier,
    };

    fn fusion(total_read: i64, tier: Tier) -> FusionRecord {
        FusionRecord {
            gene_a: Some(String::from("EML4")),
            breakpoint_a: Some(String::from("chr2:42522656")),
            gene_b: Some(String::from("ALK")),
            breakpoint_b: Some(String::from("chr2:29446394")),
            total_read: Some(total_read),
            tier,
        }
    }

    #[test]
    fn render() {
        let table = render_table(
            &["Gene", "Tier"],
            &[
                vec![String::from("BRAF"), String::from("I/II")],
                vec![String::from("NOTCH1"), String::from("III")],
            ],
        );

        insta::assert_snapshot!(table, @r###"
        Gene    Tier
        ------  ----
        BRAF    I/II
        NOTCH1  III
        "###);
    }

    #[test]
    fn render_empty() {
        insta::assert_snapshot!(render_table(&["Gene", "Tier"], &[]), @r###"
        Gene  Tier
        ----  ----
        Not Found
        "###);
    }

    #[test]
    fn split_and_notes() {
        let shaped = ShapedTables {
            mutations: Vec::new(),
            amplifications: vec![
                AmplificationRow {
                    gene: Some(String::from("MYC")),
                    copy_number: Some(5.0),
                    tier: Tier::Tier3,
                },
                AmplificationRow {
                    gene: Some(String::from("MET")),
                    copy_number: Some(9.0),
                    tier: Tier::Tier1And2,
                },
            ],
            fusions: vec![fusion(1200, Tier::Tier1And2), fusion(320, Tier::Tier3)],
        };

        let genes = [String::from("MET"), String::from("EML4-ALK fusion")];

        let sections = sections(&shaped, &genes, 500);

        assert_eq!(sections.mutation.significant.count, 0);
        assert!(sections.mutation.significant.table.ends_with("Not Found"));
        assert_eq!(sections.amplification.significant.count, 1);
        insta::assert_snapshot!(sections.amplification.significant.table, @r###"
        Gene  Estimated copy number  Tier
        ----  ---------------------  ----
        MET   9                      I/II
        "###);
        assert_eq!(sections.amplification.unknown.count, 1);
        assert_eq!(sections.fusion.significant.note, None);
        assert_eq!(sections.fusion.unknown.note.as_deref(), Some(LOW_READ_NOTE));
        assert_eq!(sections.significant_genes, "MET, EML4-ALK fusion");
    }
}
