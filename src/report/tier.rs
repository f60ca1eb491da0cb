//! Clinical tier shared by all variant categories.

/// Ordered clinical-actionability tier.
///
/// The declaration order is the canonical order: most actionable first, then
/// not applicable, then the terminal suppressed tier.  Sorting and the
/// "minimum tier" of a fusion pair rely on the derived `Ord`.
#[derive(
    serde::Serialize,
    serde::Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Clone,
    Copy,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum Tier {
    /// Tier I/II, strong or potential clinical significance.
    #[serde(rename = "I/II")]
    #[strum(serialize = "I/II")]
    Tier1And2,
    /// Tier III, unknown clinical significance.
    #[serde(rename = "III")]
    #[strum(serialize = "III")]
    Tier3,
    /// Borderline between tier III and IV.
    #[serde(rename = "III/IV")]
    #[strum(serialize = "III/IV")]
    Tier3And4,
    /// Tier IV, benign or likely benign.
    #[serde(rename = "IV")]
    #[strum(serialize = "IV")]
    Tier4,
    /// No rule matched.
    #[serde(rename = "N/A")]
    #[strum(serialize = "N/A")]
    NotApplicable,
    /// Known artifact or blacklisted call, never reported.
    #[serde(rename = "Blacklist")]
    #[strum(serialize = "Blacklist")]
    Blacklist,
}

impl Tier {
    /// The tier that marks a call as significant.
    pub const TOP: Tier = Tier::Tier1And2;

    /// Tier shown in report tables in place of `NotApplicable`.
    pub const DISPLAY_FALLBACK: Tier = Tier::Tier3;

    /// Whether the call is reported among the significant findings.
    pub fn is_significant(self) -> bool {
        self == Self::TOP
    }

    /// Whether the call must be suppressed from report output.
    pub fn is_suppressed(self) -> bool {
        self == Tier::Blacklist
    }

    /// Replace `NotApplicable` by the display fallback.
    pub fn or_display_fallback(self) -> Tier {
        match self {
            Tier::NotApplicable => Self::DISPLAY_FALLBACK,
            tier => tier,
        }
    }
}

#[cfg(test)]
mod test {
    use strum::IntoEnumIterator;

    use super::Tier;

    #[test]
    fn canonical_order() {
        let tiers = Tier::iter().collect::<Vec<_>>();
        let mut sorted = tiers.clone();
        sorted.sort();

        assert_eq!(tiers, sorted);
        assert!(Tier::Tier1And2 < Tier::Tier3);
        assert!(Tier::Tier4 < Tier::NotApplicable);
        assert!(Tier::NotApplicable < Tier::Blacklist);
    }

    #[rstest::rstest]
    #[case("I/II", Tier::Tier1And2)]
    #[case("III", Tier::Tier3)]
    #[case("III/IV", Tier::Tier3And4)]
    #[case("IV", Tier::Tier4)]
    #[case("N/A", Tier::NotApplicable)]
    #[case("Blacklist", Tier::Blacklist)]
    fn text_round_trip(#[case] text: &str, #[case] tier: Tier) -> Result<(), anyhow::Error> {
        assert_eq!(text.parse::<Tier>()?, tier);
        assert_eq!(tier.to_string(), text);

        Ok(())
    }

    #[test]
    fn unknown_text_does_not_parse() {
        assert!("V".parse::<Tier>().is_err());
    }

    #[rstest::rstest]
    #[case(Tier::NotApplicable, Tier::Tier3)]
    #[case(Tier::Tier4, Tier::Tier4)]
    #[case(Tier::Tier1And2, Tier::Tier1And2)]
    fn display_fallback(#[case] tier: Tier, #[case] expected: Tier) {
        assert_eq!(tier.or_display_fallback(), expected);
    }

    #[test]
    fn serde_uses_roman_numerals() -> Result<(), anyhow::Error> {
        assert_eq!(serde_json::to_string(&Tier::Tier3And4)?, "\"III/IV\"");
        assert_eq!(serde_json::from_str::<Tier>("\"I/II\"")?, Tier::Tier1And2);

        Ok(())
    }
}
