//! Data carried through a run: the submitted genes, the ontology pages to scrape
//! and the rows scraped from them.

/// Gene identifiers in the order they appear in the input file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneList(Vec<String>);

impl GeneList {
    /// One identifier per line. Lines are trimmed and blank ones dropped.
    pub fn from_text(text: &str) -> Self {
        let genes = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        Self(genes)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The value for the form's gene textarea.
    pub fn joined(&self) -> String {
        self.0.join("\n")
    }
}

impl<S: Into<String>> FromIterator<S> for GeneList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// The three Gene Ontology aspects GOrilla reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OntologyCategory {
    Process,
    Function,
    Component,
}

impl OntologyCategory {
    /// Order in which a run scrapes the categories.
    pub const ALL: [OntologyCategory; 3] = [
        OntologyCategory::Process,
        OntologyCategory::Function,
        OntologyCategory::Component,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OntologyCategory::Process => "process",
            OntologyCategory::Function => "function",
            OntologyCategory::Component => "component",
        }
    }

    /// Result page name under the run's base URL.
    pub fn page_name(self) -> &'static str {
        match self {
            OntologyCategory::Process => "GOResultsPROCESS.html",
            OntologyCategory::Function => "GOResultsFUNCTION.html",
            OntologyCategory::Component => "GOResultsCOMPONENT.html",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.tsv", self.as_str())
    }
}

/// Gene symbol -> detail, kept in first-seen order.
/// Inserting a symbol again replaces its detail in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneDetails(Vec<(String, String)>);

impl GeneDetails {
    pub fn insert(&mut self, symbol: String, detail: String) {
        match self.0.iter_mut().find(|(s, _)| *s == symbol) {
            Some((_, old)) => *old = detail,
            None => self.0.push((symbol, detail)),
        }
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(s, _)| s.as_str())
    }

    #[cfg(test)]
    pub(crate) fn get(&self, symbol: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, detail)| detail.as_str())
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }
}

/// One GO term from a results table. Numbers are kept as the page prints them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentRow {
    pub term_id: String,
    pub description: String,
    pub p_value: String,
    pub fdr_q_value: String,
    pub enrichment: String,
    /// N: genes in the background universe.
    pub universe_size: String,
    /// B: universe genes annotated with the term.
    pub term_genes: String,
    /// n: size of the target set.
    pub target_size: String,
    /// b: target genes annotated with the term.
    pub overlap: String,
    pub genes: GeneDetails,
}

/// Everything scraped from one ontology page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    pub url: String,
    /// "0" when GOrilla found no enrichment, empty when the table had no rows.
    pub total_genes: String,
    pub rows: Vec<EnrichmentRow>,
}
