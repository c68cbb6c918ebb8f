use crate::domain::{DocumentId, LoanId, LoanRecord, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// 貸出台帳のエラー
///
/// 単一貸出の不変条件に関わる衝突と、一般的なストレージ障害を区別する。
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// 資料に未返却の貸出が既に存在する
    #[error("document {0} already has an active loan")]
    ActiveLoanExists(DocumentId),

    /// 貸出は既に返却済み
    #[error("loan {0} has already been returned")]
    AlreadyReturned(LoanId),

    #[error("loan {0} not found")]
    LoanNotFound(LoanId),

    /// 接続断など、不変条件と無関係な永続化の失敗
    #[error("storage failure")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// 貸出台帳ポート
///
/// 貸出記録の永続化を抽象化する。記録は削除されない。
/// 更新は`mark_returned`によるreturned_atの書き込み1回のみ。
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// 貸出記録を追加する
    ///
    /// 同じ資料に未返却の記録がある場合は`ActiveLoanExists`を返し、何も書き込まない。
    /// 確認と追加は1つの原子的な操作として行われなければならない。
    async fn insert(&self, loan: LoanRecord) -> Result<()>;

    /// 資料の未返却の貸出記録を取得する
    async fn find_active_by_document(&self, document_id: DocumentId)
    -> Result<Option<LoanRecord>>;

    /// 資料の直近の貸出記録を取得する
    ///
    /// 未返却の記録があればそれを、なければ最後に返却された記録を返す。
    async fn find_latest_by_document(&self, document_id: DocumentId)
    -> Result<Option<LoanRecord>>;

    /// 返却日時を書き込む
    ///
    /// returned_atが未設定の場合のみ書き込む。設定済みなら`AlreadyReturned`、
    /// 記録がなければ`LoanNotFound`。
    async fn mark_returned(
        &self,
        loan_id: LoanId,
        returned_at: DateTime<Utc>,
    ) -> Result<LoanRecord>;

    /// IDで貸出記録を取得する
    async fn get_by_id(&self, loan_id: LoanId) -> Result<Option<LoanRecord>>;

    /// 利用者の全貸出記録を新しい順に取得する
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<LoanRecord>>;

    /// 未返却かつ`due_at < now`の記録を返却期限の古い順に取得する
    async fn find_overdue(&self, now: DateTime<Utc>) -> Result<Vec<LoanRecord>>;
}
