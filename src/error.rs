use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Need either a gene list or a run ID (exactly one). {0}")]
    Configuration(String),
    #[error("The gene list is empty, nothing to submit.")]
    EmptyGeneList,

    #[error("The submission form doesn't look like expected: {0}")]
    FormLayout(String),

    #[error("The results page doesn't match the known template: {0}")]
    Parse(String),
    #[error("The selector you are trying to scrape for is invalid. Selector: {0}")]
    ParseMissingSelector(String),

    #[error("Output path exists but is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tokio Join Error, couldn't await a task! {0}")]
    RuntimeJoin(#[from] tokio::task::JoinError),

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),
}
