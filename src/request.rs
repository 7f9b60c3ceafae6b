use reqwest::{multipart, redirect, Client, Method, Url};

use crate::form::{FieldValue, HtmlForm};
use crate::parse::parse_page;
use crate::results::{GeneList, ResultSet};
use crate::{info_time, Error, Result, DB_ALL, DB_FIELD, GENE_FIELD, RUN_PATH_SEGMENT};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// A `reqwest::Client` that follows redirects and reports where it ended up.
#[derive(Debug, Clone)]
pub struct Browser {
    client: Client,
}

impl Browser {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }

    /// GETs a page. Returns the final URL after redirects and the body.
    pub async fn fetch_page(&self, url: &str) -> Result<(Url, String)> {
        let res = self.client.get(url).send().await?.error_for_status()?;
        let final_url = res.url().clone();
        let html = res.text().await?;
        Ok((final_url, html))
    }

    /// Submits a form the way its markup asks for. Returns the final URL after redirects.
    pub async fn submit(&self, form: &HtmlForm) -> Result<Url> {
        let req = if form.method == Method::POST {
            let req = self.client.post(form.action.clone());
            if form.multipart {
                let mut body = multipart::Form::new();
                for (name, value) in form.entries() {
                    body = match value {
                        FieldValue::Text(text) => body.text(name, text),
                        FieldValue::EmptyFile => body.part(
                            name,
                            multipart::Part::bytes(Vec::new())
                                .file_name("")
                                .mime_str("application/octet-stream")?,
                        ),
                    };
                }
                req.multipart(body)
            } else {
                req.form(&form.pairs())
            }
        } else {
            // The form's fields replace whatever query the action carries.
            let mut url = form.action.clone();
            url.set_query(None);
            url.query_pairs_mut().extend_pairs(&form.pairs());
            self.client.get(url)
        };

        let res = req.send().await?.error_for_status()?;
        Ok(res.url().clone())
    }
}

/// Submits the genes through GOrilla's landing form and returns the run's base URL.
pub async fn submit_genes(browser: &Browser, service_url: &str, genes: &GeneList) -> Result<String> {
    if genes.is_empty() {
        return Err(Error::EmptyGeneList);
    }

    let (page_url, landing) = browser.fetch_page(service_url).await?;
    let mut form = HtmlForm::first_in(&landing, &page_url)?;
    form.set_text(GENE_FIELD, &genes.joined())?;
    form.select_option(DB_FIELD, DB_ALL)?;

    let landed = browser.submit(&form).await?;
    info_time!("Submission landed on {}", landed);
    Ok(base_url_of(landed))
}

/// Base URL of an existing run.
pub fn run_url(service_url: &str, run_id: &str) -> String {
    format!(
        "{}/{}/{}",
        service_url.trim_end_matches('/'),
        RUN_PATH_SEGMENT,
        run_id
    )
}

/// The run id is the last segment of the base URL; pass it to `--id` to scrape again.
pub fn run_id_of(base_url: &str) -> &str {
    base_url
        .trim_end_matches('/')
        .rsplit_once('/')
        .map_or(base_url, |(_, id)| id)
}

/// Fetches `<base_url>/<page_name>` and parses it.
pub async fn scrape_results(browser: &Browser, base_url: &str, page_name: &str) -> Result<ResultSet> {
    let url = format!("{base_url}/{page_name}");
    let (_, html) = browser.fetch_page(&url).await?;
    parse_page(html, url).await
}

/// Drops query, fragment and the page name, leaving the directory all result pages share.
fn base_url_of(mut url: Url) -> String {
    url.set_query(None);
    url.set_fragment(None);
    let url = String::from(url);
    match url.rsplit_once('/') {
        Some((base, _)) => base.to_string(),
        None => url,
    }
}
