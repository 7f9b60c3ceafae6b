use std::path::Path;

use tokio::fs;

use crate::results::ResultSet;
use crate::Result;

const HEADER: [&str; 9] = [
    "term",
    "desc",
    "pval",
    "fdr",
    "enrichment",
    "B",
    "n",
    "b",
    "genes",
];

/// File contents for one result set. Only gene symbols are kept, details are dropped.
/// Fields are not escaped: a tab inside a description breaks the row.
pub fn render_table(results: &ResultSet) -> String {
    let mut out = format!(
        "# URL: {}\n# Total genes: {}\n{}\n",
        results.url,
        results.total_genes,
        HEADER.join("\t")
    );

    for row in &results.rows {
        let genes = row.genes.symbols().collect::<Vec<_>>().join(",");
        let fields: [&str; 9] = [
            row.term_id.as_str(),
            &row.description,
            &row.p_value,
            &row.fdr_q_value,
            &row.enrichment,
            &row.term_genes,
            &row.target_size,
            &row.overlap,
            &genes,
        ];
        out.push_str(&fields.join("\t"));
        out.push('\n');
    }
    out
}

/// Creates or truncates `path` and writes the table in one go.
pub async fn write_table(results: &ResultSet, path: &Path) -> Result<()> {
    fs::write(path, render_table(results)).await?;
    Ok(())
}
