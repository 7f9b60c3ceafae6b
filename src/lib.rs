//! GOrilla enrichment scraper.
//! Submits a gene list (or picks up an existing run) and writes one TSV per GO aspect.

mod error;
mod macros;

pub mod config;
pub mod form;
pub mod parse;
pub mod process;
pub mod request;
pub mod results;
pub mod write;

pub use error::{Error, Result};

/// Default service root, overridable with `--service-url` / `GORILLA_URL`.
pub const GORILLA_URL: &str = "http://cbl-gorilla.cs.technion.ac.il/";
/// Path segment between the service root and a run id.
const RUN_PATH_SEGMENT: &str = "GOrilla";
/// Title of a results page when nothing was enriched.
const NO_ENRICHMENT_TITLE: &str = "No GO Enrichment Found";

// Landing form fields
const GENE_FIELD: &str = "target_set";
const DB_FIELD: &str = "db";
const DB_ALL: &str = "all";
