//! Filtering, ordering and facet discovery over a loaded record set.
//!
//! Every predicate narrows the result: a record is returned only when the search
//! term, both facets, the location and the expiry check all accept it. Results
//! are ordered newest-posted first with ties broken by `id`.

use std::collections::HashSet;

use chrono::NaiveDateTime;

use crate::dates::{end_of_day, start_of_day};
use crate::filter::FilterState;
use crate::model::{Facets, JobRecord};

/// Select and order the records visible under `filters` at time `now`.
pub fn query<'a>(
    records: &'a [JobRecord],
    filters: &FilterState,
    now: NaiveDateTime,
) -> Vec<&'a JobRecord> {
    let term = filters.search.to_lowercase();

    let mut results: Vec<&JobRecord> = records
        .iter()
        .filter(|job| matches_search(job, &term))
        .filter(|job| filters.types.is_empty() || filters.types.contains(&job.job_type))
        .filter(|job| filters.sectors.is_empty() || filters.sectors.contains(&job.sector))
        .filter(|job| filters.location.matches(&job.location))
        .filter(|job| is_open(job, now))
        .collect();

    results.sort_by(|a, b| b.posted_at.cmp(&a.posted_at).then(a.id.cmp(&b.id)));
    results
}

/// `term` must already be lowercased. An empty term matches everything.
pub fn matches_search(job: &JobRecord, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    job.title.to_lowercase().contains(term)
        || job.company.to_lowercase().contains(term)
        || job.sector.to_lowercase().contains(term)
        || job.tags.iter().any(|t| t.to_lowercase().contains(term))
}

/// A job stays open through the last millisecond of its deadline day.
pub fn is_open(job: &JobRecord, now: NaiveDateTime) -> bool {
    match job.deadline {
        None => true,
        Some(deadline) => end_of_day(deadline) >= start_of_day(now),
    }
}

pub fn facets(records: &[JobRecord]) -> Facets {
    let types = distinct_in_order(records.iter().map(|j| j.job_type.as_str()));
    let sectors = distinct_in_order(records.iter().map(|j| j.sector.as_str()));
    let mut locations = distinct_in_order(records.iter().map(|j| j.location.as_str()));
    locations.sort();

    Facets {
        types,
        sectors,
        locations,
    }
}

fn distinct_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| !v.is_empty() && seen.insert(*v))
        .map(str::to_string)
        .collect()
}
