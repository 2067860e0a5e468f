//! Stdio session: the shell's stand-in for the page UI.
//!
//! Input is one JSON event per line (`{"action":"search","term":"rust"}`); output is
//! one JSON message per line (`{"kind":"results","count":2,"jobs":[...]}`). Search
//! edits are debounced, every other event re-queries immediately.

use std::time::Duration;

use chrono::NaiveDateTime;
use jobboard_core::present::{self, JobCard, JobDetail};
use jobboard_core::{FacetKind, Facets, FilterState, JobBoard};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::debounce::{self, Debouncer};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Event {
    Search { term: String },
    ClearSearch,
    Toggle { facet: FacetKind, value: String },
    Location { value: String },
    Category { name: String },
    Reset,
    Open { id: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Output {
    Facets(Facets),
    Ticker { items: Vec<String> },
    Results { count: usize, jobs: Vec<JobCard> },
    Detail { job: JobDetail },
}

/// What the loop should do after an event was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    Requery,
    Debounce,
    Show(Box<JobDetail>),
    Nothing,
}

pub struct Session {
    board: JobBoard,
    filters: FilterState,
}

impl Session {
    pub fn new(board: JobBoard) -> Self {
        Self {
            board,
            filters: FilterState::new(),
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn apply(&mut self, event: Event) -> Reaction {
        match event {
            Event::Search { term } => {
                self.filters.set_search(term);
                Reaction::Debounce
            }
            Event::ClearSearch => {
                self.filters.clear_search();
                Reaction::Requery
            }
            Event::Toggle { facet, value } => {
                let selected = self.filters.toggle(facet, &value);
                debug!(?facet, value = %value, selected, "facet toggled");
                Reaction::Requery
            }
            Event::Location { value } => {
                self.filters.set_location(value);
                Reaction::Requery
            }
            Event::Category { name } => {
                self.filters.select_category(&name);
                Reaction::Requery
            }
            Event::Reset => {
                self.filters.clear();
                info!("all filters cleared");
                Reaction::Requery
            }
            Event::Open { id } => match self.board.find_by_id(id) {
                Some(job) => Reaction::Show(Box::new(present::detail(job))),
                None => {
                    debug!(id, "open ignored, no such job");
                    Reaction::Nothing
                }
            },
        }
    }

    pub fn results(&self, now: NaiveDateTime) -> Output {
        let jobs: Vec<JobCard> = self
            .board
            .query(&self.filters, now)
            .into_iter()
            .map(|job| present::card(job, now))
            .collect();
        Output::Results {
            count: jobs.len(),
            jobs,
        }
    }

    /// Messages sent once after the feed is loaded.
    pub fn initial(&self, now: NaiveDateTime) -> Vec<Output> {
        let mut out = vec![Output::Facets(self.board.facets())];
        let items = self.board.ticker(now);
        if !items.is_empty() {
            out.push(Output::Ticker { items });
        }
        out.push(self.results(now));
        out
    }
}

/// Drive `session` from `input` until end of input, writing messages to `output`.
/// A search still waiting for its quiet period at end of input is flushed.
pub async fn run<R, W>(
    mut session: Session,
    input: R,
    mut output: W,
    search_debounce: Duration,
    now: impl Fn() -> NaiveDateTime,
) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    for msg in session.initial(now()) {
        emit(&mut output, &msg).await?;
    }

    let mut lines = input.lines();
    let mut debouncer = Debouncer::new(search_debounce);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let event = match serde_json::from_str::<Event>(line) {
                    Ok(event) => event,
                    Err(e) => {
                        warn!(error = %e, line, "ignoring malformed event");
                        continue;
                    }
                };
                match session.apply(event) {
                    Reaction::Requery => {
                        debouncer.cancel();
                        emit(&mut output, &session.results(now())).await?;
                    }
                    Reaction::Debounce => debouncer.schedule(),
                    Reaction::Show(job) => {
                        emit(&mut output, &Output::Detail { job: *job }).await?;
                    }
                    Reaction::Nothing => {}
                }
            }
            _ = debounce::until(debouncer.deadline()), if debouncer.is_pending() => {
                debug!(search = %session.filters().search, "debounced search fired");
                debouncer.cancel();
                emit(&mut output, &session.results(now())).await?;
            }
        }
    }

    if debouncer.cancel() {
        emit(&mut output, &session.results(now())).await?;
    }
    output.flush().await?;
    Ok(())
}

async fn emit<W: AsyncWrite + Unpin>(output: &mut W, msg: &Output) -> Result<(), AppError> {
    let mut line = serde_json::to_vec(msg)?;
    line.push(b'\n');
    output.write_all(&line).await?;
    output.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::Value;

    const FEED: &str = "\
Title,Company,Type,Sector,Location,Tags,PostedDate,Deadline,News
Backend Engineer,Acme,Full-time,Tech,Remote,rust;tokio,2024-05-10,,Hiring fair on Friday
Designer,Beta,Contract,Design,Berlin,figma,2024-05-12,2024-06-02,
Old Role,Gamma,Contract,Tech,Remote,,2024-04-01,2024-05-01,
";

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn session() -> Session {
        Session::new(JobBoard::from_csv(FEED, now()))
    }

    fn titles(output: &Output) -> Vec<String> {
        match output {
            Output::Results { jobs, .. } => jobs.iter().map(|j| j.title.clone()).collect(),
            other => panic!("expected results, got {other:?}"),
        }
    }

    async fn drive(input: &str) -> Vec<Value> {
        let mut out: Vec<u8> = Vec::new();
        run(session(), input.as_bytes(), &mut out, Duration::from_millis(300), now)
            .await
            .unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn events_decode_from_json() {
        let e: Event = serde_json::from_str(r#"{"action":"toggle","facet":"sector","value":"Tech"}"#).unwrap();
        assert_eq!(
            e,
            Event::Toggle {
                facet: FacetKind::Sector,
                value: "Tech".to_string()
            }
        );
        let e: Event = serde_json::from_str(r#"{"action":"reset"}"#).unwrap();
        assert_eq!(e, Event::Reset);
        assert!(serde_json::from_str::<Event>(r#"{"action":"explode"}"#).is_err());
    }

    #[test]
    fn search_is_debounced_and_facets_are_immediate() {
        let mut s = session();
        let reaction = s.apply(Event::Search {
            term: "engineer".to_string(),
        });
        assert_eq!(reaction, Reaction::Debounce);
        assert_eq!(s.filters().search, "engineer");
        assert_eq!(
            s.apply(Event::Toggle {
                facet: FacetKind::Type,
                value: "Contract".to_string()
            }),
            Reaction::Requery
        );
    }

    #[test]
    fn initial_messages() {
        let s = session();
        let out = s.initial(now());
        assert_eq!(out.len(), 3);
        assert!(matches!(&out[0], Output::Facets(f) if f.types == vec!["Full-time", "Contract"]));
        assert!(matches!(&out[1], Output::Ticker { items } if items.len() == 2));
        assert_eq!(titles(&out[2]), vec!["Designer", "Backend Engineer"]);
    }

    #[test]
    fn open_unknown_id_is_a_no_op() {
        let mut s = session();
        assert_eq!(s.apply(Event::Open { id: 42 }), Reaction::Nothing);
        match s.apply(Event::Open { id: 1 }) {
            Reaction::Show(job) => assert_eq!(job.title, "Designer"),
            other => panic!("expected detail, got {other:?}"),
        }
    }

    #[test]
    fn category_then_reset() {
        let mut s = session();
        s.apply(Event::Category {
            name: "Design".to_string(),
        });
        assert_eq!(titles(&s.results(now())), vec!["Designer"]);
        s.apply(Event::Reset);
        assert!(s.filters().is_default());
        assert_eq!(titles(&s.results(now())).len(), 2);
    }

    #[test]
    fn same_text_type_and_sector_stay_separate() {
        let mut s = session();
        s.apply(Event::Toggle {
            facet: FacetKind::Sector,
            value: "Contract".to_string(),
        });
        assert!(s.filters().is_selected(FacetKind::Sector, "Contract"));
        assert!(!s.filters().is_selected(FacetKind::Type, "Contract"));
        assert!(titles(&s.results(now())).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_searches_emits_one_result() {
        let out = drive(
            "{\"action\":\"search\",\"term\":\"d\"}\n\
             {\"action\":\"search\",\"term\":\"des\"}\n",
        )
        .await;
        let kinds: Vec<&str> = out.iter().map(|m| m["kind"].as_str().unwrap()).collect();
        assert_eq!(kinds, vec!["facets", "ticker", "results", "results"]);
        assert_eq!(out[3]["count"], 1);
        assert_eq!(out[3]["jobs"][0]["title"], "Designer");
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_events_and_malformed_lines() {
        let out = drive(
            "not json\n\
             \n\
             {\"action\":\"location\",\"value\":\"Berlin\"}\n\
             {\"action\":\"open\",\"id\":99}\n\
             {\"action\":\"open\",\"id\":0}\n\
             {\"action\":\"location\",\"value\":\"all\"}\n",
        )
        .await;
        let kinds: Vec<&str> = out.iter().map(|m| m["kind"].as_str().unwrap()).collect();
        assert_eq!(
            kinds,
            vec!["facets", "ticker", "results", "results", "detail", "results"]
        );
        assert_eq!(out[3]["count"], 1);
        assert_eq!(out[4]["job"]["title"], "Backend Engineer");
        assert_eq!(out[5]["count"], 2);
    }

    #[tokio::test(start_paused = true)]
    async fn facet_event_supersedes_pending_search() {
        let out = drive(
            "{\"action\":\"search\",\"term\":\"acme\"}\n\
             {\"action\":\"toggle\",\"facet\":\"type\",\"value\":\"Full-time\"}\n",
        )
        .await;
        let kinds: Vec<&str> = out.iter().map(|m| m["kind"].as_str().unwrap()).collect();
        assert_eq!(kinds, vec!["facets", "ticker", "results", "results"]);
        assert_eq!(out[3]["jobs"][0]["title"], "Backend Engineer");
    }
}
