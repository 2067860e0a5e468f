pub mod board;
pub mod csv;
pub mod dates;
pub mod filter;
pub mod model;
pub mod parser;
pub mod present;
pub mod query;
pub mod ticker;

pub use board::JobBoard;
pub use filter::{FacetKind, FilterState, LocationFilter};
pub use model::{Facets, JobRecord};
