use thiserror::Error;

use super::LoanId;

/// 入力値のバリデーションエラー
///
/// ストレージへのアクセス前に検出され、再試行されない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("document id must be a positive integer, got {0}")]
    InvalidDocumentId(i64),

    #[error("user id must be a positive integer, got {0}")]
    InvalidUserId(i64),

    #[error("due_days must be a positive integer, got {0}")]
    NonPositiveDueDays(i64),

    /// 貸出期間が上限を超える、または返却期限が表現可能な日時の範囲を超える
    #[error("due_days is out of range: {0}")]
    DueDaysOutOfRange(i64),
}

/// 返却のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReturnLoanError {
    /// 既に返却済み（returned_atは一度しか書き込めない）
    #[error("loan {0} has already been returned")]
    AlreadyReturned(LoanId),
}
