use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Sentinel location value meaning "no location restriction".
pub const ALL_LOCATIONS: &str = "all";

/// Category shortcuts offered above the listing. Selecting one searches for its
/// lowercased name.
pub const CATEGORIES: &[&str] = &["Tech", "Design", "Marketing", "Finance", "Sales", "HR"];

/// A multi-select filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetKind {
    Type,
    Sector,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LocationFilter {
    #[default]
    All,
    Exact(String),
}

impl From<String> for LocationFilter {
    fn from(value: String) -> Self {
        if value == ALL_LOCATIONS {
            LocationFilter::All
        } else {
            LocationFilter::Exact(value)
        }
    }
}

impl From<LocationFilter> for String {
    fn from(value: LocationFilter) -> Self {
        match value {
            LocationFilter::All => ALL_LOCATIONS.to_string(),
            LocationFilter::Exact(loc) => loc,
        }
    }
}

impl LocationFilter {
    /// Exact, case-sensitive comparison.
    pub fn matches(&self, location: &str) -> bool {
        match self {
            LocationFilter::All => true,
            LocationFilter::Exact(loc) => loc == location,
        }
    }
}

/// Current filter selection. An empty facet set places no restriction on that
/// facet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub search: String,
    pub types: BTreeSet<String>,
    pub sectors: BTreeSet<String>,
    pub location: LocationFilter,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
    }

    /// Search for a category shortcut by its lowercased name.
    pub fn select_category(&mut self, name: &str) {
        self.search = name.to_lowercase();
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = LocationFilter::from(location.into());
    }

    /// Flip membership of `value` in the `kind` facet. Returns whether the value is
    /// selected afterwards.
    pub fn toggle(&mut self, kind: FacetKind, value: &str) -> bool {
        let set = self.facet_mut(kind);
        if set.remove(value) {
            false
        } else {
            set.insert(value.to_string());
            true
        }
    }

    /// Membership is keyed by facet kind: a type and a sector with the same text are
    /// independent selections.
    pub fn is_selected(&self, kind: FacetKind, value: &str) -> bool {
        self.facet(kind).contains(value)
    }

    pub fn facet(&self, kind: FacetKind) -> &BTreeSet<String> {
        match kind {
            FacetKind::Type => &self.types,
            FacetKind::Sector => &self.sectors,
        }
    }

    fn facet_mut(&mut self, kind: FacetKind) -> &mut BTreeSet<String> {
        match kind {
            FacetKind::Type => &mut self.types,
            FacetKind::Sector => &mut self.sectors,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}
