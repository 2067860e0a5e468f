//! Record parser for the job feed.
//!
//! The first CSV record is the header. Each logical field is resolved to a header
//! column once, through an ordered alias list; each data record is then read into a
//! `RawRow` and normalized into a `JobRecord` with defaults for missing cells.
//!
//! The parser never fails: bad dates become absent, missing cells become empty
//! strings, rows with no content at all are skipped.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::csv::tokenize;
use crate::dates::parse_date;
use crate::model::{
    JobRecord, DEFAULT_COMPANY, DEFAULT_LOCATION, DEFAULT_SALARY, DEFAULT_TITLE, DEFAULT_TYPE,
};

/// Logical fields a feed column can populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Company,
    Location,
    Type,
    Salary,
    Tags,
    ImageUrl,
    Featured,
    PostedDate,
    Deadline,
    ApplyLink,
    Description,
    Eligibility,
    Materials,
    Notification,
    Documents,
    News,
    Fee,
    Sector,
}

impl Field {
    pub const ALL: [Field; 19] = [
        Field::Title,
        Field::Company,
        Field::Location,
        Field::Type,
        Field::Salary,
        Field::Tags,
        Field::ImageUrl,
        Field::Featured,
        Field::PostedDate,
        Field::Deadline,
        Field::ApplyLink,
        Field::Description,
        Field::Eligibility,
        Field::Materials,
        Field::Notification,
        Field::Documents,
        Field::News,
        Field::Fee,
        Field::Sector,
    ];

    /// Header names accepted for this field, highest priority first. Compared
    /// against headers with spaces, `_` and `-` removed.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::Title => &["title"],
            Field::Company => &["company"],
            Field::Location => &["location"],
            Field::Type => &["type"],
            Field::Salary => &["salary"],
            Field::Tags => &["tags"],
            Field::ImageUrl => &["imageurl", "image"],
            Field::Featured => &["featured"],
            Field::PostedDate => &["posteddate"],
            Field::Deadline => &["deadline", "applyby", "expires"],
            Field::ApplyLink => &["applylink"],
            Field::Description => &["description"],
            Field::Eligibility => &["eligibility"],
            Field::Materials => &["materials"],
            Field::Notification => &["notification"],
            Field::Documents => &["documents"],
            Field::News => &["news", "updates"],
            Field::Fee => &["fee", "fees"],
            Field::Sector => &["sector"],
        }
    }
}

/// Normalized header row plus the column chosen for each logical field.
#[derive(Debug, Clone)]
pub struct Header {
    names: Vec<String>,
    columns: HashMap<Field, usize>,
}

impl Header {
    pub fn new(cells: &[String]) -> Self {
        let names: Vec<String> = cells.iter().map(|c| normalize_header(c)).collect();
        let compact: Vec<String> = names.iter().map(|n| compact(n)).collect();

        let mut columns = HashMap::new();
        for field in Field::ALL {
            if let Some(idx) = resolve_column(&compact, field.aliases()) {
                columns.insert(field, idx);
            }
        }

        Self { names, columns }
    }

    /// Lowercased column names in source order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, field: Field) -> Option<usize> {
        self.columns.get(&field).copied()
    }
}

/// One data record keyed by lowercased column name. Missing cells read as `""`.
#[derive(Debug, Clone)]
pub struct RawRow<'h> {
    header: &'h Header,
    cells: Vec<String>,
}

impl<'h> RawRow<'h> {
    pub fn new(header: &'h Header, cells: Vec<String>) -> Self {
        Self { header, cells }
    }

    /// Cell for a raw column name (already lowercased).
    pub fn get(&self, name: &str) -> &str {
        self.header
            .names
            .iter()
            .position(|n| n == name)
            .and_then(|idx| self.cells.get(idx))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn field(&self, field: Field) -> &str {
        self.header
            .column(field)
            .and_then(|idx| self.cells.get(idx))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }
}

/// Parse feed text into job records in source order.
///
/// `loaded_at` stands in for rows whose posted date is missing or unparsable.
pub fn parse_jobs(text: &str, loaded_at: NaiveDateTime) -> Vec<JobRecord> {
    let text = text.trim_start_matches('\u{feff}').trim();
    let mut records = tokenize(text).into_iter();

    let Some(header_cells) = records.next() else {
        return Vec::new();
    };
    let header = Header::new(&header_cells);
    debug!(columns = ?header.names(), "feed header resolved");

    let mut jobs = Vec::new();
    let mut total = 0usize;
    for (idx, cells) in records.enumerate() {
        total += 1;
        let row = RawRow::new(&header, cells);
        if row.is_blank() {
            debug!(row = idx, "skipping blank row");
            continue;
        }
        jobs.push(build_record(idx, &row, loaded_at));
    }

    debug!(rows = total, jobs = jobs.len(), "feed parsed");
    jobs
}

fn build_record(id: usize, row: &RawRow<'_>, loaded_at: NaiveDateTime) -> JobRecord {
    let deadline_raw = row.field(Field::Deadline).to_string();
    let deadline = if deadline_raw.is_empty() {
        None
    } else {
        parse_date(&deadline_raw)
            .inspect_err(|e| debug!(row = id, error = %e, "deadline ignored"))
            .ok()
    };

    let posted_raw = row.field(Field::PostedDate);
    let posted_at = if posted_raw.is_empty() {
        loaded_at
    } else {
        parse_date(posted_raw)
            .map(|d| d.and_time(chrono::NaiveTime::MIN))
            .inspect_err(|e| debug!(row = id, error = %e, "posted date defaulted to load time"))
            .unwrap_or(loaded_at)
    };

    JobRecord {
        id,
        title: or_default(row.field(Field::Title), DEFAULT_TITLE),
        company: or_default(row.field(Field::Company), DEFAULT_COMPANY),
        location: or_default(row.field(Field::Location), DEFAULT_LOCATION),
        job_type: or_default(row.field(Field::Type), DEFAULT_TYPE),
        salary: or_default(row.field(Field::Salary), DEFAULT_SALARY),
        tags: split_list(row.field(Field::Tags)),
        image_ref: optional(row.field(Field::ImageUrl)),
        featured: row.field(Field::Featured).eq_ignore_ascii_case("true"),
        posted_at,
        deadline,
        deadline_raw,
        apply_link: optional(row.field(Field::ApplyLink)),
        description: optional(row.field(Field::Description)),
        eligibility: optional(row.field(Field::Eligibility)),
        materials: optional(row.field(Field::Materials)),
        notification: optional(row.field(Field::Notification)),
        documents: optional(row.field(Field::Documents)),
        news: optional(row.field(Field::News)),
        fee: optional(row.field(Field::Fee)),
        sector: row.field(Field::Sector).to_string(),
    }
}

/// Split a `;`-separated cell, trimming entries and dropping empty ones.
pub fn split_list(cell: &str) -> Vec<String> {
    cell.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn or_default(cell: &str, default: &str) -> String {
    if cell.is_empty() {
        default.to_string()
    } else {
        cell.to_string()
    }
}

fn optional(cell: &str) -> Option<String> {
    (!cell.is_empty()).then(|| cell.to_string())
}

fn normalize_header(cell: &str) -> String {
    cell.trim().replace('"', "").to_lowercase()
}

fn compact(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .collect()
}

/// Exact matches across every alias win over substring matches; within each pass
/// the alias order decides, then column order.
fn resolve_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    for alias in aliases {
        if let Some(idx) = headers.iter().position(|h| h == alias) {
            return Some(idx);
        }
    }
    for alias in aliases {
        if let Some(idx) = headers.iter().position(|h| h.contains(alias)) {
            return Some(idx);
        }
    }
    None
}
