use chrono::NaiveDateTime;

use crate::filter::FilterState;
use crate::model::{Facets, JobRecord};
use crate::parser::parse_jobs;
use crate::query;
use crate::ticker::ticker_items;

/// The loaded, read-only record set with the operations the renderer needs.
#[derive(Debug, Clone, Default)]
pub struct JobBoard {
    records: Vec<JobRecord>,
}

impl JobBoard {
    pub fn new(records: Vec<JobRecord>) -> Self {
        Self { records }
    }

    pub fn from_csv(text: &str, loaded_at: NaiveDateTime) -> Self {
        Self::new(parse_jobs(text, loaded_at))
    }

    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find_by_id(&self, id: usize) -> Option<&JobRecord> {
        self.records.iter().find(|job| job.id == id)
    }

    pub fn facets(&self) -> Facets {
        query::facets(&self.records)
    }

    pub fn query(&self, filters: &FilterState, now: NaiveDateTime) -> Vec<&JobRecord> {
        query::query(&self.records, filters, now)
    }

    pub fn ticker(&self, now: NaiveDateTime) -> Vec<String> {
        ticker_items(&self.records, now)
    }
}
