use crate::domain::DocumentId;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 資料カタログポート
///
/// 貸出コンテキストとカタログコンテキストの境界を維持する。
/// 貸出コンテキストは資料IDのみを知り、資料の詳細は知らない。
#[async_trait]
pub trait DocumentCatalog: Send + Sync {
    /// 資料が存在するか確認する
    ///
    /// 存在しない資料への貸出記録の作成を防ぐために使用される。
    async fn exists(&self, document_id: DocumentId) -> Result<bool>;
}
