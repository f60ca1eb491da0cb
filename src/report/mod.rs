//! Implementation of `report run` subcommand.

pub mod blacklist;
pub mod category;
pub mod conf;
pub mod output;
pub mod qc;
pub mod rules;
pub mod schema;
pub mod tier;

use std::path::{Path, PathBuf};

use thousands::Separable;

use self::{
    blacklist::Blacklist,
    category::{cnv, fusion, snv, Categorized},
    conf::PanelConfig,
    output::{
        sections::{sections, ReportSections},
        shaped::{shape, ShapedTables},
        sheets::{sheets, write_sheets},
        significant::significant_genes,
        write_report, ReportDocument,
    },
    schema::{RawTable, SchemaNormalizer, VariantRow},
};
use crate::common::{self, expand_path};

/// Command line arguments for `report run` subcommand.
#[derive(Debug, Default, clap::Parser)]
#[command(author, version, about = "Build report tables for an Oncomine case", long_about = None)]
pub struct Args {
    /// Path to the Oncomine variant table of the DNA library.
    #[clap(long)]
    pub path_input: String,
    /// Path to the Oncomine variant table of the RNA library, if sequenced separately.
    #[clap(long)]
    pub path_input_rna: Option<String>,
    /// Path to the output directory.
    #[clap(long)]
    pub path_output_dir: String,
    /// Path to the blacklist table.
    #[clap(long)]
    pub path_blacklist: Option<String>,
    /// Path to JSON file overriding the panel configuration.
    #[clap(long)]
    pub path_panel: Option<String>,
    /// Path to JSON file with the coverage and genomic metrics.
    #[clap(long)]
    pub path_metrics: Option<String>,
    /// Name of the case; derived from the input file name if missing.
    #[clap(long)]
    pub case_name: Option<String>,
}

/// Everything computed for one case.
#[derive(Debug, Clone)]
pub struct CaseReport {
    pub categorized: Categorized,
    pub shaped: ShapedTables,
    pub significant_genes: Vec<String>,
    pub sections: ReportSections,
}

/// Derive the case name from an input file name such as `M23-0042D_oncomine.tsv`.
///
/// The part before the first underscore is taken and its trailing library
/// letter and dash are removed.  Without underscore, the extensions are
/// stripped instead.
pub fn case_name_from_path(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match file_name.split_once('_') {
        Some((prefix, _)) => {
            let mut chars = prefix.chars();
            chars.next_back();
            chars.as_str().trim_end_matches('-').to_string()
        }
        None => file_name.split('.').next().unwrap_or_default().to_string(),
    };
    if name.is_empty() {
        String::from("case")
    } else {
        name
    }
}

/// Categorize, shape and summarize the normalized rows of one case.
pub fn process_case(
    rows: &[VariantRow],
    conf: &PanelConfig,
    blacklist: Option<&Blacklist>,
) -> Result<CaseReport, anyhow::Error> {
    let categorized = Categorized {
        snv: snv::category(conf)?.process(rows, blacklist),
        cnv: cnv::category(conf).process(rows, blacklist),
        fusion: fusion::category(conf).process(rows, blacklist),
    };
    for tables in categorized.tables() {
        tracing::info!(
            "{}: {} calls, {} no-calls",
            tables.kind,
            tables.call.len().separate_with_commas(),
            tables.nocall.len().separate_with_commas()
        );
    }

    let shaped = shape(&categorized)?;
    let significant_genes = significant_genes(&shaped);
    let sections = sections(&shaped, &significant_genes, conf.low_fusion_reads);

    Ok(CaseReport {
        categorized,
        shaped,
        significant_genes,
        sections,
    })
}

/// Read and normalize one input table.
fn load_rows(normalizer: &SchemaNormalizer, path: &str) -> Result<Vec<VariantRow>, anyhow::Error> {
    let path = PathBuf::from(expand_path(path));
    let raw = RawTable::from_path(&path)?;
    let rows = normalizer
        .normalize(&raw)
        .map_err(|e| anyhow::anyhow!("could not normalize {:?}: {}", &path, e))?;
    tracing::info!(
        "read {} rows from {:?}",
        rows.len().separate_with_commas(),
        &path
    );
    Ok(rows)
}

/// Main entry point for `report run` sub command.
pub fn run(args_common: &common::Args, args: &Args) -> Result<(), anyhow::Error> {
    let before_anything = std::time::Instant::now();
    tracing::info!("args_common = {:#?}", &args_common);
    tracing::info!("args = {:#?}", &args);

    let case_name = args
        .case_name
        .clone()
        .unwrap_or_else(|| case_name_from_path(Path::new(&args.path_input)));
    tracing::info!("case name: {}", &case_name);

    tracing::info!("loading panel configuration...");
    let conf = match &args.path_panel {
        Some(path) => PanelConfig::from_path(Path::new(&expand_path(path)))?,
        None => PanelConfig::default(),
    };
    let blacklist = match &args.path_blacklist {
        Some(path) => Some(Blacklist::from_path(Path::new(&expand_path(path)))?),
        None => {
            tracing::warn!("no blacklist given, blacklist suppression is skipped");
            None
        }
    };

    tracing::info!("reading input tables...");
    let normalizer = SchemaNormalizer::oncomine()?;
    let mut rows = load_rows(&normalizer, &args.path_input)?;
    if let Some(path) = &args.path_input_rna {
        rows.extend(load_rows(&normalizer, path)?);
    }

    tracing::info!("building report tables...");
    let report = process_case(&rows, &conf, blacklist.as_ref())?;
    tracing::info!(
        "significant genes: {}",
        report.sections.significant_genes.as_str()
    );

    let qc = match &args.path_metrics {
        Some(path) => {
            let metrics = qc::Metrics::from_path(Path::new(&expand_path(path)))?;
            Some(qc::summarize(&metrics)?)
        }
        None => None,
    };

    tracing::info!("writing output files...");
    let out_dir = PathBuf::from(expand_path(&args.path_output_dir));
    std::fs::create_dir_all(&out_dir)
        .map_err(|e| anyhow::anyhow!("could not create {:?}: {}", &out_dir, e))?;
    let manifest = write_sheets(&out_dir, &sheets(&report.categorized))?;
    tracing::info!("wrote sheets, manifest at {:?}", &manifest);
    let path_report = out_dir.join(format!("{}_report.json", &case_name));
    write_report(
        &path_report,
        &ReportDocument {
            case_name: &case_name,
            tables: &report.shaped,
            significant_genes: &report.significant_genes,
            sections: &report.sections,
            qc: qc.as_ref(),
        },
    )?;
    tracing::info!("wrote report to {:?}", &path_report);

    tracing::info!(
        "All of `report run` completed in {:?}",
        before_anything.elapsed()
    );
    Ok(())
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{case_name_from_path, process_case, run, Args};
    use crate::{
        err::ReportError,
        report::{
            blacklist::Blacklist,
            conf::PanelConfig,
            schema::{RawTable, SchemaNormalizer, VariantRow},
            tier::Tier,
        },
    };

    fn case_rows() -> Result<Vec<VariantRow>, anyhow::Error> {
        let raw = RawTable::from_path(Path::new("tests/report/case.tsv"))?;
        Ok(SchemaNormalizer::oncomine()?.normalize(&raw)?)
    }

    #[rstest]
    #[case("M23-0042D_oncomine.tsv", "M23-0042")]
    #[case("path/to/M23-0042-D_oncomine.tsv.gz", "M23-0042")]
    #[case("case.tsv", "case")]
    #[case("M23-0042.tsv.gz", "M23-0042")]
    #[case("_x.tsv", "case")]
    fn case_name(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(case_name_from_path(Path::new(path)), expected);
    }

    #[test]
    fn process_case_file() -> Result<(), anyhow::Error> {
        let rows = case_rows()?;
        let blacklist = Blacklist::from_path(Path::new("tests/report/blacklist.tsv"))?;

        let report = process_case(&rows, &PanelConfig::default(), Some(&blacklist))?;

        let snv = &report.categorized.snv;
        assert_eq!(
            snv.call
                .iter()
                .map(|c| (c.variant.gene_name.clone().unwrap_or_default(), c.tier))
                .collect::<Vec<_>>(),
            vec![
                (String::from("BRAF"), Tier::Tier1And2),
                (String::from("UGT1A1"), Tier::Tier3),
                (String::from("KRAS"), Tier::Tier4),
                (String::from("TP53"), Tier::Blacklist),
            ]
        );
        assert_eq!(
            snv.nocall.iter().map(|r| r.index).collect::<Vec<_>>(),
            vec![4]
        );
        assert_eq!(report.categorized.cnv.call.len(), 3);
        assert_eq!(report.categorized.fusion.call.len(), 4);
        assert_eq!(
            report
                .categorized
                .fusion
                .nocall
                .iter()
                .map(|r| r.index)
                .collect::<Vec<_>>(),
            vec![13]
        );

        assert_eq!(
            report
                .shaped
                .mutations
                .iter()
                .map(|r| (r.gene.clone().unwrap_or_default(), r.vaf.clone(), r.tier))
                .collect::<Vec<_>>(),
            vec![
                (String::from("BRAF"), Some(String::from("25.6%")), Tier::Tier1And2),
                (String::from("UGT1A1"), Some(String::from("48.0%")), Tier::Tier3),
                (String::from("KRAS"), Some(String::from("12.0%")), Tier::Tier4),
            ]
        );
        assert_eq!(
            report
                .shaped
                .amplifications
                .iter()
                .map(|r| (r.gene.clone().unwrap_or_default(), r.tier))
                .collect::<Vec<_>>(),
            vec![
                (String::from("MET"), Tier::Tier1And2),
                (String::from("MYCN"), Tier::Tier3),
            ]
        );
        assert_eq!(
            report
                .shaped
                .fusions
                .iter()
                .map(|r| (r.gene_a.clone(), r.gene_b.clone(), r.total_read))
                .collect::<Vec<_>>(),
            vec![
                (Some(String::from("ALK")), Some(String::from("EML4")), Some(1250)),
                (Some(String::from("RET")), Some(String::from("KIF5B")), Some(320)),
            ]
        );
        assert_eq!(
            report.significant_genes,
            vec![
                String::from("BRAF"),
                String::from("MET"),
                String::from("ALK-EML4 fusion"),
                String::from("RET-KIF5B fusion"),
            ]
        );
        assert!(report.sections.fusion.significant.note.is_some());
        assert!(report.sections.fusion.unknown.table.ends_with("Not Found"));

        Ok(())
    }

    #[test]
    fn without_blacklist_hotspot_is_reported() -> Result<(), anyhow::Error> {
        let rows = case_rows()?;

        let report = process_case(&rows, &PanelConfig::default(), None)?;

        assert!(report
            .shaped
            .mutations
            .iter()
            .any(|r| r.gene.as_deref() == Some("TP53")));

        Ok(())
    }

    #[test]
    fn unpaired_fusion_aborts_case() -> Result<(), anyhow::Error> {
        let mut rows = case_rows()?;
        rows.retain(|r| r.gene.as_deref() != Some("KIF5B"));

        let err = process_case(&rows, &PanelConfig::default(), None)
            .expect_err("unpaired breakpoint must fail");

        assert_eq!(
            err.downcast_ref::<ReportError>(),
            Some(&ReportError::AggregationFault {
                total_read: Some(320),
                size: 1,
            })
        );

        Ok(())
    }

    #[test]
    fn smoke_run() -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        let args = Args {
            path_input: String::from("tests/report/case.tsv"),
            path_output_dir: tmp_dir.join("out").to_string_lossy().into_owned(),
            path_blacklist: Some(String::from("tests/report/blacklist.tsv")),
            path_panel: Some(String::from("tests/report/panel.json")),
            path_metrics: Some(String::from("tests/report/metrics.json")),
            case_name: Some(String::from("M23-0042")),
            ..Default::default()
        };

        run(&crate::common::Args::default(), &args)?;

        let out_dir = tmp_dir.join("out");
        for name in [
            "SNV.tsv",
            "SNV_nocall.tsv",
            "CNV.tsv",
            "CNV_nocall.tsv",
            "Fusion.tsv",
            "Fusion_nocall.tsv",
            "sheets.json",
        ] {
            assert!(out_dir.join(name).exists(), "missing {}", name);
        }
        let report: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(
            out_dir.join("M23-0042_report.json"),
        )?)?;
        assert_eq!(report["case_name"], "M23-0042");
        assert_eq!(report["tables"]["Mutation"][0]["Gene"], "BRAF");
        assert_eq!(
            report["tables"]["Mutation"][0]["Variant allele frequency(%)"],
            "25.6%"
        );
        assert_eq!(report["tables"]["Fusion"][0]["Chromosome:BreakpointA"], "chr2:29446394");
        assert_eq!(report["qc"]["total_quality_score"], "Good");
        assert_eq!(report["qc"]["loh"], "not available (see note)");

        Ok(())
    }
}
