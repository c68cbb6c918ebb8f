use crate::domain::DocumentId;
use crate::ports::document_catalog::{DocumentCatalog as DocumentCatalogTrait, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Mock implementation of DocumentCatalog
///
/// Supports stateful testing by storing document IDs.
/// Documents registered with `add_document` exist; everything else does not.
#[derive(Debug, Default)]
pub struct DocumentCatalog {
    documents: Mutex<HashSet<DocumentId>>,
}

impl DocumentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog that already contains the given documents.
    pub fn with_documents(documents: impl IntoIterator<Item = DocumentId>) -> Self {
        Self {
            documents: Mutex::new(documents.into_iter().collect()),
        }
    }

    pub fn add_document(&self, document_id: DocumentId) {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(document_id);
    }
}

#[async_trait]
impl DocumentCatalogTrait for DocumentCatalog {
    async fn exists(&self, document_id: DocumentId) -> Result<bool> {
        Ok(self
            .documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&document_id))
    }
}
