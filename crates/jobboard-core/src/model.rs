use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "Position";
pub const DEFAULT_COMPANY: &str = "Company";
pub const DEFAULT_LOCATION: &str = "Remote";
pub const DEFAULT_TYPE: &str = "Full-time";
pub const DEFAULT_SALARY: &str = "Not disclosed";

/// A single job posting parsed from the feed.
///
/// Records are immutable once loaded. Required text fields are always populated
/// (the parser substitutes defaults); optional free-text fields are `None` when the
/// source cell was empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    /// 0-based index of the data row in the feed, unique within a load.
    pub id: usize,
    pub title: String,
    pub company: String,
    pub location: String,
    /// Employment type facet, e.g. "Full-time", "Contract".
    #[serde(rename = "type")]
    pub job_type: String,
    pub salary: String,
    pub tags: Vec<String>,
    /// Logo/banner reference: a plain URL or a Google Drive file link.
    pub image_ref: Option<String>,
    pub featured: bool,
    pub posted_at: NaiveDateTime,
    /// Last day applications are accepted; valid through the end of that day.
    pub deadline: Option<NaiveDate>,
    /// Deadline cell as written in the feed, kept for display when unparsable.
    pub deadline_raw: String,
    pub apply_link: Option<String>,
    pub description: Option<String>,
    pub eligibility: Option<String>,
    /// `;`-separated `label|url` pairs.
    pub materials: Option<String>,
    /// `;`-separated `label|url` pairs or bare URLs.
    pub notification: Option<String>,
    /// `;`-separated list of document names.
    pub documents: Option<String>,
    pub news: Option<String>,
    pub fee: Option<String>,
    /// Sector facet, empty when the feed has none.
    pub sector: String,
}

/// Distinct facet values offered to the filter controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    /// Employment types in first-seen order.
    pub types: Vec<String>,
    /// Sectors in first-seen order.
    pub sectors: Vec<String>,
    /// Locations sorted lexicographically.
    pub locations: Vec<String>,
}
