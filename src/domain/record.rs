//! Bibliographic record returned by a search.

use serde::{Deserialize, Serialize};

/// One bibliographic entry as returned by a record source.
///
/// Immutable once constructed. The `id` is source-assigned and uniqueness
/// is not guaranteed across sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Source-assigned identifier
    pub id: String,

    /// Title of the work
    pub title: String,

    /// Abstract text, when the source can supply it
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,

    /// Authors in source order, possibly empty
    #[serde(default)]
    pub authors: Vec<String>,

    /// Publication year
    pub year: Option<i32>,

    /// DOI, when known
    pub doi: Option<String>,
}

impl Record {
    /// Create a record with only the required fields set.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            abstract_text: None,
            authors: Vec::new(),
            year: None,
            doi: None,
        }
    }

    /// Set the abstract.
    pub fn with_abstract(mut self, text: impl Into<String>) -> Self {
        self.abstract_text = Some(text.into());
        self
    }

    /// Set the authors.
    pub fn with_authors(mut self, authors: Vec<String>) -> Self {
        self.authors = authors;
        self
    }

    /// Set the publication year.
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Set the DOI.
    pub fn with_doi(mut self, doi: impl Into<String>) -> Self {
        self.doi = Some(doi.into());
        self
    }

    /// Render the record for a judge prompt.
    pub fn prompt_text(&self) -> String {
        let abstract_text = self.abstract_text.as_deref().unwrap_or("No Abstract");
        let year = self
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "Unknown".to_string());
        format!(
            "Title: {}\nAbstract: {}\nYear: {}",
            self.title, abstract_text, year
        )
    }
}
