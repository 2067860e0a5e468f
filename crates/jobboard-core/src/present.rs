//! View models handed to the renderer: everything a card or the detail panel shows,
//! derived from a `JobRecord` without any markup.

use std::sync::LazyLock;

use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::dates::format_date;
use crate::model::JobRecord;
use crate::parser::split_list;

const NEW_WINDOW_DAYS: i64 = 7;
const EXPIRING_SOON_DAYS: i64 = 3;
const CARD_TAG_LIMIT: usize = 3;
const MILLIS_PER_DAY: i64 = 86_400_000;

const AVATAR_BASE: &str = "https://ui-avatars.com/api/";
const DRIVE_VIEW_BASE: &str = "https://drive.google.com/uc?export=view&id=";
const NO_FEE: &str = "No Fee / Not Specified";
const NO_DEADLINE: &str = "N/A";
const NO_LINK: &str = "#";

static DRIVE_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"file/d/([a-zA-Z0-9_-]+)").expect("valid regex"));
static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "date", rename_all = "snake_case")]
pub enum DeadlineBadge {
    ExpiresSoon,
    ApplyBy(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCard {
    pub id: usize,
    pub title: String,
    pub company: String,
    pub logo_url: String,
    pub is_new: bool,
    pub deadline_badge: Option<DeadlineBadge>,
    pub tags: Vec<String>,
    pub location: String,
    pub salary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    pub bold: bool,
}

pub type RichLine = Vec<Span>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDetail {
    pub id: usize,
    pub banner_url: Option<String>,
    #[serde(rename = "type")]
    pub job_type: String,
    pub featured: bool,
    pub title: String,
    pub company: String,
    pub salary: String,
    pub location: String,
    pub posted_on: String,
    pub fee: Vec<RichLine>,
    pub apply_by: String,
    pub description: Vec<RichLine>,
    pub eligibility: Option<Vec<RichLine>>,
    pub materials: Vec<Link>,
    pub notifications: Vec<Link>,
    pub documents: Vec<String>,
    pub apply_link: String,
    pub share_text: String,
}

pub fn card(job: &JobRecord, now: NaiveDateTime) -> JobCard {
    JobCard {
        id: job.id,
        title: job.title.clone(),
        company: job.company.clone(),
        logo_url: logo_url(job),
        is_new: is_new(job, now),
        deadline_badge: deadline_badge(job, now),
        tags: job.tags.iter().take(CARD_TAG_LIMIT).cloned().collect(),
        location: job.location.clone(),
        salary: job.salary.clone(),
    }
}

pub fn detail(job: &JobRecord) -> JobDetail {
    let apply_by = match job.deadline {
        Some(date) => format_date(date),
        None if !job.deadline_raw.is_empty() => job.deadline_raw.clone(),
        None => NO_DEADLINE.to_string(),
    };

    JobDetail {
        id: job.id,
        banner_url: banner_url(job),
        job_type: job.job_type.clone(),
        featured: job.featured,
        title: job.title.clone(),
        company: job.company.clone(),
        salary: job.salary.clone(),
        location: job.location.clone(),
        posted_on: format_date(job.posted_at.date()),
        fee: rich_text(job.fee.as_deref().unwrap_or(NO_FEE)),
        apply_by,
        description: rich_text(job.description.as_deref().unwrap_or("")),
        eligibility: job.eligibility.as_deref().map(rich_text),
        materials: job.materials.as_deref().map(material_links).unwrap_or_default(),
        notifications: job
            .notification
            .as_deref()
            .map(notification_links)
            .unwrap_or_default(),
        documents: job.documents.as_deref().map(split_list).unwrap_or_default(),
        apply_link: job.apply_link.clone().unwrap_or_else(|| NO_LINK.to_string()),
        share_text: share_text(job),
    }
}

pub fn share_text(job: &JobRecord) -> String {
    format!("Check out this {} role at {}", job.title, job.company)
}

/// Posted less than a week before `now`.
pub fn is_new(job: &JobRecord, now: NaiveDateTime) -> bool {
    now - job.posted_at < TimeDelta::days(NEW_WINDOW_DAYS)
}

/// Whole days until the deadline, rounded up. Negative once it has passed.
pub fn days_left(job: &JobRecord, now: NaiveDateTime) -> Option<i64> {
    let deadline = job.deadline?.and_time(NaiveTime::MIN);
    let ms = (deadline - now).num_milliseconds();
    let days = ms.div_euclid(MILLIS_PER_DAY);
    Some(if ms.rem_euclid(MILLIS_PER_DAY) == 0 { days } else { days + 1 })
}

pub fn deadline_badge(job: &JobRecord, now: NaiveDateTime) -> Option<DeadlineBadge> {
    let days = days_left(job, now)?;
    if (0..=EXPIRING_SOON_DAYS).contains(&days) {
        Some(DeadlineBadge::ExpiresSoon)
    } else {
        job.deadline.map(|d| DeadlineBadge::ApplyBy(format_date(d)))
    }
}

/// Resolved image for a card; falls back to a generated avatar of the company name.
pub fn logo_url(job: &JobRecord) -> String {
    banner_url(job).unwrap_or_else(|| avatar_url(&job.company))
}

/// Resolved image for the detail panel; `None` when the reference is not a usable URL.
pub fn banner_url(job: &JobRecord) -> Option<String> {
    let image = job.image_ref.as_deref()?;
    if image.contains("drive.google") {
        let caps = DRIVE_FILE_RE.captures(image)?;
        return Some(format!("{DRIVE_VIEW_BASE}{}", &caps[1]));
    }
    image.starts_with("http").then(|| image.to_string())
}

pub fn avatar_url(name: &str) -> String {
    let params = [
        ("name", name),
        ("background", "f3f4f6"),
        ("color", "6b7280"),
        ("size", "128"),
        ("font-size", "0.33"),
    ];
    match Url::parse_with_params(AVATAR_BASE, &params) {
        Ok(url) => url.to_string(),
        Err(_) => AVATAR_BASE.to_string(),
    }
}

/// `;` separates lines; `**text**` marks bold spans.
pub fn rich_text(text: &str) -> Vec<RichLine> {
    text.split(';')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_spans)
        .collect()
}

fn parse_spans(line: &str) -> RichLine {
    let mut spans = Vec::new();
    let mut last = 0;
    for caps in BOLD_RE.captures_iter(line) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            spans.push(Span {
                text: line[last..whole.start()].to_string(),
                bold: false,
            });
        }
        spans.push(Span {
            text: caps[1].to_string(),
            bold: true,
        });
        last = whole.end();
    }
    if last < line.len() {
        spans.push(Span {
            text: line[last..].to_string(),
            bold: false,
        });
    }
    spans
}

/// `label|url` entries; a missing url links nowhere.
pub fn material_links(cell: &str) -> Vec<Link> {
    entries(cell)
        .map(|entry| {
            let mut parts = entry.splitn(2, '|');
            let label = parts.next().map(str::trim).filter(|l| !l.is_empty());
            let url = parts.next().map(str::trim).filter(|u| !u.is_empty());
            Link {
                label: label.unwrap_or(entry).to_string(),
                url: url.unwrap_or(NO_LINK).to_string(),
            }
        })
        .collect()
}

/// `label|url` pairs or bare URLs.
pub fn notification_links(cell: &str) -> Vec<Link> {
    entries(cell)
        .map(|entry| {
            let parts: Vec<&str> = entry.split('|').collect();
            if let [label, url] = parts.as_slice() {
                Link {
                    label: label.trim().to_string(),
                    url: url.trim().to_string(),
                }
            } else if entry.starts_with("http") {
                Link {
                    label: "View Notification".to_string(),
                    url: entry.to_string(),
                }
            } else {
                Link {
                    label: entry.to_string(),
                    url: NO_LINK.to_string(),
                }
            }
        })
        .collect()
}

fn entries(cell: &str) -> impl Iterator<Item = &str> {
    cell.split(';').map(str::trim).filter(|e| !e.is_empty())
}
