use crate::search::types::{DocId, DocumentRecord};
use serde::{Deserialize, Serialize};

/// One line of a JSON-lines corpus.
///
/// `doc_id` is optional; entries without one are numbered by their line index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusEntry {
    #[serde(default)]
    pub doc_id: Option<DocId>,
    pub url: String,
    pub title: String,
    pub text: String,
}

impl CorpusEntry {
    pub fn into_record(self, line: usize) -> DocumentRecord {
        DocumentRecord {
            doc_id: self.doc_id.unwrap_or(line as DocId),
            url: self.url,
            title: self.title,
            text: self.text,
        }
    }
}

/// Summary of a build, logged by the CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    pub documents: usize,
    pub tokens: usize,
    pub postings: usize,
    pub index_shards: usize,
    pub document_shards: usize,
}
