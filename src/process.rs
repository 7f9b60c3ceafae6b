use std::io::ErrorKind;
use std::path::Path;

use chrono::Local;
use tokio::fs;

use crate::config::{RunConfig, RunSource};
use crate::request::{run_id_of, run_url, scrape_results, submit_genes, Browser};
use crate::results::OntologyCategory;
use crate::write::write_table;
use crate::{info_time, Error, Result};

/// Resolves the run, then scrapes and writes every ontology category in turn.
/// A failing category aborts the run; files already written stay on disk.
pub async fn process_run(config: &RunConfig) -> Result<()> {
    ensure_out_dir(&config.out_dir).await?;
    let browser = Browser::new()?;

    let base_url = match &config.source {
        RunSource::Genes(genes) => {
            let start_time = Local::now();
            info_time!("Submitting {} genes to GOrilla...", genes.len());
            let base_url = submit_genes(&browser, &config.service_url, genes).await?;
            info_time!(
                start_time,
                "Run {} created, results under {}",
                run_id_of(&base_url),
                base_url
            );
            base_url
        }
        RunSource::RunId(id) => run_url(&config.service_url, id),
    };

    for category in OntologyCategory::ALL {
        let start_time = Local::now();
        info_time!(
            "Scraping results for GO {}...",
            category.as_str().to_uppercase()
        );
        let results = scrape_results(&browser, &base_url, category.page_name()).await?;

        let path = config.out_dir.join(category.file_name());
        write_table(&results, &path).await?;
        info_time!(
            start_time,
            "Wrote {} terms to {}",
            results.rows.len(),
            path.display()
        );
    }

    Ok(())
}

/// Creates the output directory if it's missing. Only the last component is created.
async fn ensure_out_dir(dir: &Path) -> Result<()> {
    match fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(Error::NotADirectory(dir.to_path_buf())),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            fs::create_dir(dir).await?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn out_dir_is_created_when_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("enrichment");
        ensure_out_dir(&dir).await.unwrap();
        assert!(dir.is_dir());
        // Existing directory is fine too.
        ensure_out_dir(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn file_in_place_of_out_dir_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("taken");
        std::fs::write(&file, "x").unwrap();
        let res = ensure_out_dir(&file).await;
        assert!(matches!(res, Err(Error::NotADirectory(p)) if p == file));
    }

    #[tokio::test]
    async fn nested_missing_out_dir_is_not_created() {
        let tmp = tempfile::tempdir().unwrap();
        let res = ensure_out_dir(&tmp.path().join("a").join("b")).await;
        assert!(matches!(res, Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn bad_out_dir_fails_before_any_request() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("taken");
        std::fs::write(&file, "x").unwrap();
        let config = RunConfig {
            service_url: "http://127.0.0.1:9".into(),
            out_dir: file,
            source: RunSource::RunId("abc".into()),
        };
        assert!(matches!(process_run(&config).await, Err(Error::NotADirectory(_))));
    }
}
