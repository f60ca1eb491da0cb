//! Everything handed to the external writers: sheets, shaped tables and the
//! report document.

pub mod sections;
pub mod shaped;
pub mod sheets;
pub mod significant;

use std::{io::Write, path::Path};

use serde::Serialize;

use self::{sections::ReportSections, shaped::ShapedTables};
use super::qc::QcSummary;
use crate::common::open_write_maybe_gz;

/// The report document consumed by the text template.
#[derive(Debug, Serialize)]
pub struct ReportDocument<'a> {
    pub case_name: &'a str,
    pub tables: &'a ShapedTables,
    pub significant_genes: &'a [String],
    pub sections: &'a ReportSections,
    pub qc: Option<&'a QcSummary>,
}

/// Write the report document as pretty-printed JSON.
pub fn write_report(path: &Path, document: &ReportDocument) -> Result<(), anyhow::Error> {
    let mut writer = open_write_maybe_gz(path)
        .map_err(|e| anyhow::anyhow!("Cannot open {:?} for writing: {:?}", path, e))?;
    serde_json::to_writer_pretty(&mut writer, document)?;
    writer.flush()?;
    Ok(())
}
