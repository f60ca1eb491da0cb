//! Data-driven conditions and the ordered tier rule cascade.
//!
//! Partition predicates and tier overrides are both expressed as `Condition`
//! values so that a variant category is plain configuration evaluated by the
//! routines here.

use regex::Regex;

use super::{
    blacklist::Blacklist,
    schema::{Col, VariantRow},
    tier::Tier,
};

/// Predicate over one `VariantRow`.
#[derive(Debug, Clone)]
pub enum Condition {
    /// All sub-conditions hold.
    All(Vec<Condition>),
    /// Any sub-condition holds.
    Any(Vec<Condition>),
    /// The sub-condition does not hold.
    Not(Box<Condition>),
    /// The column has a value.
    Present(Col),
    /// The column equals the value.
    Equals(Col, String),
    /// The column equals the value, ignoring case.
    EqualsIgnoreCase(Col, String),
    /// The column equals one of the values; false if missing.
    In(Col, Vec<String>),
    /// The column contains the needle, ignoring case; false if missing.
    ContainsIgnoreCase(Col, String),
    /// The column starts with one of the prefixes; false if missing.
    StartsWithAny(Col, Vec<String>),
    /// The column matches the regular expression; false if missing.
    Matches(Col, Regex),
    /// The textual value is at least this long; false if missing.
    MinLen(Col, usize),
    /// The numeric value is below the threshold; false if missing.
    Below(Col, f64),
    /// The row's key is listed in the blacklist; false without blacklist.
    Blacklisted,
}

impl Condition {
    /// Shortcut for `Condition::Not`.
    pub fn not(condition: Condition) -> Self {
        Condition::Not(Box::new(condition))
    }

    /// Shortcut for `Condition::Equals`.
    pub fn equals(col: Col, value: &str) -> Self {
        Condition::Equals(col, value.to_string())
    }

    /// Shortcut for `Condition::In`.
    pub fn one_of(col: Col, values: &[&str]) -> Self {
        Condition::In(col, values.iter().map(|v| v.to_string()).collect())
    }

    /// Evaluate the condition on `row`.
    pub fn eval(&self, row: &VariantRow, blacklist: Option<&Blacklist>) -> bool {
        match self {
            Condition::All(conditions) => conditions.iter().all(|c| c.eval(row, blacklist)),
            Condition::Any(conditions) => conditions.iter().any(|c| c.eval(row, blacklist)),
            Condition::Not(condition) => !condition.eval(row, blacklist),
            Condition::Present(col) => row.text(*col).is_some(),
            Condition::Equals(col, value) => row.text(*col).as_deref() == Some(value.as_str()),
            Condition::EqualsIgnoreCase(col, value) => row
                .text(*col)
                .map(|v| v.eq_ignore_ascii_case(value))
                .unwrap_or(false),
            Condition::In(col, values) => row
                .text(*col)
                .map(|v| values.iter().any(|value| *value == v))
                .unwrap_or(false),
            Condition::ContainsIgnoreCase(col, needle) => row
                .text(*col)
                .map(|v| v.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false),
            Condition::StartsWithAny(col, prefixes) => row
                .text(*col)
                .map(|v| prefixes.iter().any(|p| v.starts_with(p.as_str())))
                .unwrap_or(false),
            Condition::Matches(col, regex) => {
                row.text(*col).map(|v| regex.is_match(&v)).unwrap_or(false)
            }
            Condition::MinLen(col, len) => row
                .text(*col)
                .map(|v| v.chars().count() >= *len)
                .unwrap_or(false),
            Condition::Below(col, threshold) => {
                row.number(*col).map(|v| v < *threshold).unwrap_or(false)
            }
            Condition::Blacklisted => blacklist.map(|b| b.contains(row)).unwrap_or(false),
        }
    }
}

/// One override in the tier cascade: if `when` holds, the tier becomes `tier`.
#[derive(Debug, Clone)]
pub struct TierRule {
    /// Short label used in trace logging.
    pub label: String,
    pub when: Condition,
    pub tier: Tier,
}

impl TierRule {
    pub fn new(label: &str, when: Condition, tier: Tier) -> Self {
        Self {
            label: label.to_string(),
            when,
            tier,
        }
    }
}

/// The default cascade shared by all categories.
///
/// The uncertain-significance rule excludes benign texts, so that a benign
/// classification is never overridden by the later rule.
pub fn default_rules() -> Vec<TierRule> {
    let clin_sig = Col::ClinicalSignificance;
    vec![
        TierRule::new(
            "clinvar-benign",
            Condition::ContainsIgnoreCase(clin_sig, String::from("benign")),
            Tier::Tier4,
        ),
        TierRule::new(
            "clinvar-uncertain",
            Condition::All(vec![
                Condition::not(Condition::ContainsIgnoreCase(clin_sig, String::from("benign"))),
                Condition::Any(vec![
                    Condition::EqualsIgnoreCase(clin_sig, String::from("not_provided")),
                    Condition::EqualsIgnoreCase(clin_sig, String::from("uncertain_significance")),
                    Condition::ContainsIgnoreCase(clin_sig, String::from("conflicting")),
                ]),
            ]),
            Tier::Tier3And4,
        ),
        TierRule::new(
            "hotspot",
            Condition::one_of(Col::Hotspot, &["Deleterious", "Hotspot"]),
            Tier::Tier1And2,
        ),
    ]
}

/// Run the cascade on one row: start at N/A, the last matching rule wins.
pub fn assign_tier(row: &VariantRow, rules: &[TierRule], blacklist: Option<&Blacklist>) -> Tier {
    rules.iter().fold(Tier::NotApplicable, |tier, rule| {
        if rule.when.eval(row, blacklist) {
            tracing::trace!("row {} matches rule {} -> {}", row.index, rule.label, rule.tier);
            rule.tier
        } else {
            tier
        }
    })
}
