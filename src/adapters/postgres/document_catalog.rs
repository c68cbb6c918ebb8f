use crate::domain::DocumentId;
use crate::ports::document_catalog::{DocumentCatalog as DocumentCatalogTrait, Result};
use async_trait::async_trait;
use sqlx::PgPool;

/// DocumentCatalogのPostgreSQL実装
///
/// カタログ側が所有する`documents`テーブルを読み取るだけで、書き込みはしない。
pub struct DocumentCatalog {
    pool: PgPool,
}

impl DocumentCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentCatalogTrait for DocumentCatalog {
    async fn exists(&self, document_id: DocumentId) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM documents WHERE id = $1)")
                .bind(document_id.value())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}
