//! Abstract-page and listing-page bodies

use serde::Serialize;

use eprint::DocMetadata;

/// Body of an abstract page
#[derive(Debug, Serialize)]
pub struct AbstractResponse {
    #[serde(flatten)]
    pub metadata: DocMetadata,

    /// URL of the LaTeXML-converted HTML paper; omitted when no converted
    /// document is offered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latexml_url: Option<String>,
}

/// One row of a month listing page
#[derive(Debug, Serialize)]
pub struct ListingEntry {
    pub article_id: String,
    pub id_with_version: String,
    pub version: u32,
    pub title: String,
    pub authors: String,
    pub primary_category: String,
}

impl From<DocMetadata> for ListingEntry {
    fn from(doc: DocMetadata) -> Self {
        Self {
            article_id: doc.article_id.to_string(),
            id_with_version: doc.id_with_version(),
            version: doc.version,
            title: doc.title,
            authors: doc.authors,
            primary_category: doc.primary_category,
        }
    }
}
