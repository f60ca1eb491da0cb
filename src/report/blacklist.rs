//! Blacklist of known-artifact variants.

use std::{collections::HashSet, io::Read, path::Path};

use serde::{Deserialize, Deserializer};

use super::schema::VariantRow;
use crate::common::open_read_maybe_gz;

/// Identifying key of a blacklisted variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct BlacklistKey {
    /// Gene symbol
    #[serde(rename = "Gene_name", deserialize_with = "from_missing_dot")]
    pub gene_name: Option<String>,
    /// HGVS protein change
    #[serde(rename = "AA_Change", default, deserialize_with = "from_missing_dot")]
    pub aa_change: Option<String>,
    /// HGVS coding change
    #[serde(
        rename = "Nucleotide_change",
        default,
        deserialize_with = "from_missing_dot"
    )]
    pub nucleotide_change: Option<String>,
}

impl From<&VariantRow> for BlacklistKey {
    fn from(row: &VariantRow) -> Self {
        Self {
            gene_name: row.gene_name.clone(),
            aa_change: row.aa_change.clone(),
            nucleotide_change: row.nucleotide_change.clone(),
        }
    }
}

/// Deserialize optional string, mapping `"."` and `""` to `None`.
fn from_missing_dot<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Deserialize::deserialize(deserializer)?;
    Ok(s.map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && s != "."))
}

/// Read-only reference table of blacklisted variants, shared across cases.
#[derive(Debug, Clone, Default)]
pub struct Blacklist {
    keys: HashSet<BlacklistKey>,
}

impl Blacklist {
    /// Construct from keys.
    pub fn new<I: IntoIterator<Item = BlacklistKey>>(keys: I) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Read from a tab-separated table with canonical column names.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, anyhow::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .comment(Some(b'#'))
            .flexible(true)
            .from_reader(reader);
        let keys = reader
            .deserialize()
            .collect::<Result<Vec<BlacklistKey>, csv::Error>>()?;
        Ok(Self::new(keys))
    }

    /// Read from a (possibly gzip-compressed) file.
    pub fn from_path(path: &Path) -> Result<Self, anyhow::Error> {
        let blacklist = Self::from_reader(open_read_maybe_gz(path)?)
            .map_err(|e| anyhow::anyhow!("could not read blacklist {:?}: {}", path, e))?;
        tracing::info!("loaded {} blacklist entries", blacklist.len());
        Ok(blacklist)
    }

    /// Whether the row's key is blacklisted.
    pub fn contains(&self, row: &VariantRow) -> bool {
        self.keys.contains(&BlacklistKey::from(row))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
