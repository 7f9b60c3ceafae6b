use scraper::{ElementRef, Html, Selector};
use tokio::task::spawn_blocking;

use crate::results::{EnrichmentRow, GeneDetails, ResultSet};
use crate::{Error, Result, NO_ENRICHMENT_TITLE};

/// Where a table sits on a page and how its rows are laid out.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TableSchema {
    pub table: &'static str,
    /// Position among all `table` matches in document order.
    pub table_index: usize,
    pub row: &'static str,
    pub header_rows: usize,
    pub cell: &'static str,
    pub min_cells: usize,
}

/// GOrilla's results page: the first table is page layout, the second holds the terms.
pub(crate) const RESULTS_TABLE: TableSchema = TableSchema {
    table: "table",
    table_index: 1,
    row: "tr",
    header_rows: 1,
    cell: "td",
    min_cells: 6,
};

/// Column positions in `RESULTS_TABLE`.
mod col {
    pub const TERM: usize = 0;
    pub const DESCRIPTION: usize = 1;
    pub const P_VALUE: usize = 2;
    pub const FDR: usize = 3;
    pub const ENRICHMENT: usize = 4;
    pub const GENES: usize = 5;
}

impl TableSchema {
    /// Text content of every cell of every data row.
    pub fn extract(&self, doc: &Html) -> Result<Vec<Vec<String>>> {
        let table_selector = create_selector(self.table)?;
        let row_selector = create_selector(self.row)?;
        let cell_selector = create_selector(self.cell)?;

        let table = doc.select(&table_selector).nth(self.table_index).ok_or_else(|| {
            Error::Parse(format!(
                "expected at least {} `{}` elements",
                self.table_index + 1,
                self.table
            ))
        })?;

        table
            .select(&row_selector)
            .skip(self.header_rows)
            .enumerate()
            .map(|(i, row)| {
                let cells: Vec<String> = row.select(&cell_selector).map(element_text).collect();
                if cells.len() < self.min_cells {
                    return Err(Error::Parse(format!(
                        "row {} has {} cells, expected at least {}",
                        i + 1,
                        cells.len(),
                        self.min_cells
                    )));
                }
                Ok(cells)
            })
            .collect()
    }
}

/// Parses a results page off the async runtime.
pub(crate) async fn parse_page(html: String, url: String) -> Result<ResultSet> {
    spawn_blocking(move || parse_results_page(&html, url)).await?
}

/// Turns a GOrilla results page into a `ResultSet`.
/// The "no enrichment" page is a normal outcome with `total_genes == "0"`.
pub fn parse_results_page(html: &str, url: String) -> Result<ResultSet> {
    let doc = Html::parse_document(html);

    if page_title(&doc)?.as_deref() == Some(NO_ENRICHMENT_TITLE) {
        return Ok(ResultSet {
            url,
            total_genes: "0".into(),
            rows: Vec::new(),
        });
    }

    let mut total_genes = String::new();
    let mut rows = Vec::new();
    for cells in RESULTS_TABLE.extract(&doc)? {
        let (enrichment, [universe_size, term_genes, target_size, overlap]) =
            parse_enrichment(&cells[col::ENRICHMENT])?;
        // N should be the same on every row; the last one is what gets reported.
        total_genes.clone_from(&universe_size);

        rows.push(EnrichmentRow {
            term_id: cells[col::TERM].trim().to_string(),
            description: cells[col::DESCRIPTION].trim().to_string(),
            p_value: cells[col::P_VALUE].trim().to_string(),
            fdr_q_value: cells[col::FDR].trim().to_string(),
            enrichment,
            universe_size,
            term_genes,
            target_size,
            overlap,
            genes: parse_genes(&cells[col::GENES])?,
        });
    }

    Ok(ResultSet {
        url,
        total_genes,
        rows,
    })
}

/// Splits `"2.5 (120,45,30,12)"` into the ratio and the `[N, B, n, b]` counts.
pub fn parse_enrichment(text: &str) -> Result<(String, [String; 4])> {
    let malformed = || Error::Parse(format!("malformed enrichment cell: {:?}", text.trim()));

    let mut tokens = text.split_whitespace();
    let ratio = tokens.next().ok_or_else(malformed)?;
    let counts = tokens
        .next()
        .and_then(|t| t.strip_prefix('('))
        .and_then(|t| t.strip_suffix(')'))
        .ok_or_else(malformed)?;

    let counts: Vec<String> = counts.split(',').map(|c| c.trim().to_string()).collect();
    let counts: [String; 4] = counts.try_into().map_err(|_| malformed())?;

    Ok((ratio.to_string(), counts))
}

/// Reads the genes cell: a "Show genes" toggle line followed by `SYMBOL - detail` lines.
pub fn parse_genes(text: &str) -> Result<GeneDetails> {
    let mut genes = GeneDetails::default();
    for line in text.trim().lines().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (symbol, detail) = line
            .split_once('-')
            .ok_or_else(|| Error::Parse(format!("gene entry without a detail: {line:?}")))?;
        genes.insert(symbol.trim().to_string(), detail.trim().to_string());
    }
    Ok(genes)
}

fn page_title(doc: &Html) -> Result<Option<String>> {
    let title_selector = create_selector("title")?;
    Ok(doc
        .select(&title_selector)
        .next()
        .map(|title| element_text(title).trim().to_string()))
}

#[inline]
fn element_text(el: ElementRef) -> String {
    el.text().collect()
}

#[inline]
pub(crate) fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::ParseMissingSelector(sel_str.into()))
}
