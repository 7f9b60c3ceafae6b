use std::path::PathBuf;

use clap::Parser;
use tokio::fs;

use crate::results::GeneList;
use crate::{Error, Result, GORILLA_URL};

/// Submits genes to GOrilla for term enrichment analysis
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Args {
    /// Directory to output the enrichment tables
    #[arg(short, long)]
    pub outdir: PathBuf,

    /// Path to a file containing newline-delimited genes, preferably as gene symbols
    #[arg(short, long)]
    pub genefile: Option<PathBuf>,

    /// ID of an existing GOrilla run, to skip directly to results scrape
    #[arg(short = 'i', long = "id")]
    pub run_id: Option<String>,

    /// Root URL of the GOrilla service
    #[arg(long, env = "GORILLA_URL", default_value = GORILLA_URL)]
    pub service_url: String,
}

/// Where a run starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunSource {
    Genes(GeneList),
    RunId(String),
}

impl RunSource {
    /// Exactly one of the two has to be given. The gene file is read here.
    pub async fn resolve(genefile: Option<PathBuf>, run_id: Option<String>) -> Result<Self> {
        match (genefile, run_id) {
            (Some(path), None) => {
                let text = fs::read_to_string(&path).await?;
                Ok(RunSource::Genes(GeneList::from_text(&text)))
            }
            (None, Some(id)) => Ok(RunSource::RunId(id)),
            (Some(_), Some(_)) => Err(Error::Configuration(
                "Got both --genefile and --id.".into(),
            )),
            (None, None) => Err(Error::Configuration(
                "Got neither --genefile nor --id.".into(),
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub service_url: String,
    pub out_dir: PathBuf,
    pub source: RunSource,
}

impl RunConfig {
    pub async fn from_args(args: Args) -> Result<Self> {
        let source = RunSource::resolve(args.genefile, args.run_id).await?;
        Ok(Self {
            service_url: args.service_url,
            out_dir: args.outdir,
            source,
        })
    }
}
