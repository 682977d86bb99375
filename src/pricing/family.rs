//! Family-type detection from traveler counts.

use serde::{Deserialize, Serialize};

/// Id of the family type used when nothing else matches
pub const DEFAULT_FAMILY_TYPE_ID: &str = "SD";

/// A predefined traveler composition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyType {
    pub id: String,
    pub name: String,
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
}

impl FamilyType {
    /// Two adults, no children; used when the reference table is unusable
    pub fn fallback() -> Self {
        Self {
            id: DEFAULT_FAMILY_TYPE_ID.to_string(),
            name: "Stellar Duo".to_string(),
            adults: 2,
            children: 0,
            infants: 0,
        }
    }

    fn is_exactly(&self, adults: u32, children: u32, infants: u32) -> bool {
        self.adults == adults && self.children == children && self.infants == infants
    }

    fn can_seat(&self, adults: u32, children: u32, infants: u32) -> bool {
        self.adults == adults && self.children >= children && self.infants >= infants
    }
}

/// Pick the family type for the given traveler counts.
///
/// Table order is the priority order:
/// 1. first entry with exactly these counts
/// 2. first entry with the same adults and at least as many children and infants
/// 3. the default entry, else the first entry, else [`FamilyType::fallback`]
pub fn match_family_type(
    adults: u32,
    children: u32,
    infants: u32,
    table: &[FamilyType],
) -> FamilyType {
    table
        .iter()
        .find(|ft| ft.is_exactly(adults, children, infants))
        .or_else(|| table.iter().find(|ft| ft.can_seat(adults, children, infants)))
        .or_else(|| table.iter().find(|ft| ft.id == DEFAULT_FAMILY_TYPE_ID))
        .or_else(|| table.first())
        .cloned()
        .unwrap_or_else(FamilyType::fallback)
}
