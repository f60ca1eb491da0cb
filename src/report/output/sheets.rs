//! Per-category call and no-call sheets with writer hints.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::{
    common::open_write_maybe_gz,
    report::{
        category::{Categorized, CategoryTables, Kind},
        schema::Col,
    },
};

/// Autofilter hint: show only rows whose `column` holds `value`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutoFilter {
    /// Index of the filtered column.
    pub column: usize,
    /// Visible value.
    pub value: String,
    /// Zero-based indexes of the data rows hidden by the filter.
    pub hidden_rows: Vec<usize>,
}

/// A named table of display strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    pub name: String,
    pub header: Vec<String>,
    #[serde(skip)]
    pub rows: Vec<Vec<String>>,
    /// Indexes of columns to be formatted as percentages.
    pub percent_columns: Vec<usize>,
    pub autofilter: Option<AutoFilter>,
}

impl Sheet {
    fn new(name: String, columns: &[Col], rows: Vec<Vec<String>>) -> Self {
        Self {
            name,
            header: columns.iter().map(|c| c.to_string()).collect(),
            rows,
            percent_columns: columns
                .iter()
                .enumerate()
                .filter(|(_, c)| **c == Col::Vaf)
                .map(|(i, _)| i)
                .collect(),
            autofilter: None,
        }
    }

    /// File name of the sheet's TSV file.
    pub fn file_name(&self) -> String {
        format!("{}.tsv", self.name)
    }
}

/// Call and no-call sheets of one category.
pub fn category_sheets(tables: &CategoryTables) -> [Sheet; 2] {
    let call_rows = tables
        .call
        .iter()
        .map(|called| {
            tables
                .call_columns
                .iter()
                .map(|col| match col {
                    Col::Tier => called.tier.to_string(),
                    col => called.variant.text(*col).unwrap_or_default(),
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    let nocall_rows = tables
        .nocall
        .iter()
        .map(|row| {
            tables
                .nocall_columns
                .iter()
                .map(|col| row.text(*col).unwrap_or_default())
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let mut call = Sheet::new(tables.kind.to_string(), &tables.call_columns, call_rows);
    if tables.kind == Kind::Cnv {
        call.autofilter = amp_filter(&call, &tables.call_columns);
    }
    let nocall = Sheet::new(
        format!("{}_nocall", tables.kind),
        &tables.nocall_columns,
        nocall_rows,
    );

    [call, nocall]
}

/// Autofilter on the `Call` column showing amplifications only.
fn amp_filter(sheet: &Sheet, columns: &[Col]) -> Option<AutoFilter> {
    let column = columns.iter().position(|c| *c == Col::Call)?;
    Some(AutoFilter {
        column,
        value: String::from("AMP"),
        hidden_rows: sheet
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.get(column).map(|v| v.as_str()) != Some("AMP"))
            .map(|(i, _)| i)
            .collect(),
    })
}

/// All sheets of a case in report order.
pub fn sheets(categorized: &Categorized) -> Vec<Sheet> {
    categorized
        .tables()
        .iter()
        .flat_map(|tables| category_sheets(tables))
        .collect()
}

/// Manifest entry written to `sheets.json`.
#[derive(Debug, Serialize)]
struct ManifestEntry<'a> {
    file: String,
    #[serde(flatten)]
    sheet: &'a Sheet,
}

/// Write each sheet as TSV file into `dir` and the manifest as `sheets.json`.
pub fn write_sheets(dir: &Path, sheets: &[Sheet]) -> Result<PathBuf, anyhow::Error> {
    for sheet in sheets {
        let path = dir.join(sheet.file_name());
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(open_write_maybe_gz(&path).map_err(|e| {
                anyhow::anyhow!("Cannot open {:?} for writing: {:?}", &path, e)
            })?);
        writer.write_record(&sheet.header)?;
        for row in &sheet.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        tracing::debug!("wrote {} rows to {:?}", sheet.rows.len(), &path);
    }

    let manifest = sheets
        .iter()
        .map(|sheet| ManifestEntry {
            file: sheet.file_name(),
            sheet,
        })
        .collect::<Vec<_>>();
    let path = dir.join("sheets.json");
    let mut writer = open_write_maybe_gz(&path)
        .map_err(|e| anyhow::anyhow!("Cannot open {:?} for writing: {:?}", &path, e))?;
    serde_json::to_writer_pretty(&mut writer, &manifest)?;
    writer.flush()?;

    Ok(path)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{category_sheets, write_sheets};
    use crate::report::{
        category::{cnv, snv, Called},
        conf::PanelConfig,
        schema::VariantRow,
        tier::Tier,
    };

    fn cnv_call(gene: &str, call: &str, tier: Tier) -> Called {
        Called {
            tier,
            variant: VariantRow {
                gene_name: Some(gene.to_string()),
                call: Some(call.to_string()),
                copy_number: Some(6.0),
                row_type: Some(String::from("CNV")),
                ..Default::default()
            },
        }
    }

    #[test]
    fn cnv_autofilter() {
        let category = cnv::category(&PanelConfig::default());
        let mut tables = category.process(&[], None);
        tables.call = vec![
            cnv_call("MET", "AMP", Tier::Tier1And2),
            cnv_call("CDKN2A", "DEL", Tier::NotApplicable),
            cnv_call("MYC", "AMP", Tier::NotApplicable),
        ];

        let [call, nocall] = category_sheets(&tables);

        assert_eq!(call.name, "CNV");
        assert_eq!(nocall.name, "CNV_nocall");
        assert_eq!(&call.header[..3], &["Gene_name", "Copy_number", "Tier"]);
        assert_eq!(call.rows[1][2], "N/A");
        let filter = call.autofilter.expect("CNV call sheet carries a filter");
        assert_eq!(filter.column, 4);
        assert_eq!(filter.hidden_rows, vec![1]);
        assert!(nocall.autofilter.is_none());
    }

    #[test]
    fn snv_percent_column() -> Result<(), anyhow::Error> {
        let category = snv::category(&PanelConfig::default())?;
        let tables = category.process(&[], None);

        let [call, nocall] = category_sheets(&tables);

        assert_eq!(call.percent_columns, vec![3]);
        assert_eq!(nocall.percent_columns, vec![3]);
        assert!(call.autofilter.is_none());

        Ok(())
    }

    #[test]
    fn write() -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        let category = cnv::category(&PanelConfig::default());
        let mut tables = category.process(&[], None);
        tables.call = vec![cnv_call("MET", "AMP", Tier::Tier1And2)];

        let manifest = write_sheets(&tmp_dir, &category_sheets(&tables))?;

        let tsv = std::fs::read_to_string(tmp_dir.join("CNV.tsv"))?;
        assert!(tsv.starts_with("Gene_name\tCopy_number\tTier\t"));
        assert!(tsv.contains("MET\t6\tI/II\tCNV\tAMP"));
        assert!(tmp_dir.join("CNV_nocall.tsv").exists());
        let manifest: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(manifest)?)?;
        assert_eq!(manifest[0]["file"], "CNV.tsv");
        assert_eq!(manifest[0]["autofilter"]["value"], "AMP");
        assert_eq!(manifest[1]["name"], "CNV_nocall");

        Ok(())
    }
}
