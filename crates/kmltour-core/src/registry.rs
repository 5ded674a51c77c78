//! A set of documents with one marked current

use crate::document::Document;
use crate::error::{KmlError, Result};

/// Ordered documents plus the index of the current one
#[derive(Debug, Clone, Default)]
pub struct DocumentRegistry {
    documents: Vec<Document>,
    current: usize,
}

impl DocumentRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current document, created on first use
    pub fn current_document(&mut self) -> &mut Document {
        if self.documents.is_empty() {
            log::debug!("creating default document");
            self.documents.push(Document::default());
            self.current = 0;
        }
        &mut self.documents[self.current]
    }

    /// Append a document and make it current, returning its index
    pub fn add_document(&mut self, document: Document) -> usize {
        self.documents.push(document);
        self.current = self.documents.len() - 1;
        self.current
    }

    /// Make the document at `index` current
    ///
    /// # Errors
    ///
    /// Returns [`KmlError::InvalidValue`] if `index` is out of range.
    pub fn switch(&mut self, index: usize) -> Result<()> {
        if index >= self.documents.len() {
            return Err(KmlError::InvalidValue(format!(
                "document index {index} out of range; registry holds {}",
                self.documents.len()
            )));
        }
        self.current = index;
        Ok(())
    }

    /// Index of the current document
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }
}
