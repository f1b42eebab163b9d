use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Grid regions served by the analysis pipeline.
///
/// The set is fixed; anything outside it is rejected at the boundary with
/// [`crate::error::GridError::InvalidRegion`] instead of being defaulted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
    EnumString, EnumIter,
)]
pub enum RegionKey {
    Northern,
    Western,
    Eastern,
    Southern,
    #[strum(serialize = "North-Eastern")]
    #[serde(rename = "North-Eastern")]
    NorthEastern,
}

impl RegionKey {
    /// All regions in canonical order.
    pub fn all() -> impl Iterator<Item = RegionKey> {
        RegionKey::iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Northern", RegionKey::Northern)]
    #[case("Western", RegionKey::Western)]
    #[case("Eastern", RegionKey::Eastern)]
    #[case("Southern", RegionKey::Southern)]
    #[case("North-Eastern", RegionKey::NorthEastern)]
    fn test_parse_canonical_names(#[case] raw: &str, #[case] expected: RegionKey) {
        assert_eq!(raw.parse::<RegionKey>().unwrap(), expected);
        assert_eq!(expected.to_string(), raw);
    }

    #[rstest]
    #[case("")]
    #[case("northern")]
    #[case("NorthEastern")]
    #[case("Central")]
    fn test_unknown_names_rejected(#[case] raw: &str) {
        assert!(raw.parse::<RegionKey>().is_err());
    }

    #[test]
    fn test_all_regions() {
        assert_eq!(RegionKey::all().count(), 5);
    }

    #[test]
    fn test_serde_uses_canonical_name() {
        let json = serde_json::to_string(&RegionKey::NorthEastern).unwrap();
        assert_eq!(json, "\"North-Eastern\"");
    }
}
