use crate::domain::{DocumentId, ValidationError};
use crate::ports::RepositoryError;
use thiserror::Error;

/// 貸出アプリケーション層のエラー
///
/// 呼び出し側はメッセージを解析せず、バリアントで分岐できる。
#[derive(Debug, Error)]
pub enum LendingError {
    /// 入力値が不正（正でない日数、識別子の欠落など）
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ValidationError),

    /// 資料がカタログに存在しない
    #[error("Document {0} not found")]
    DocumentNotFound(DocumentId),

    /// 資料は貸出中
    #[error("Document {0} is already borrowed")]
    AlreadyBorrowed(DocumentId),

    /// 資料に返却対象の貸出がない
    #[error("Document {0} is not currently borrowed")]
    NotCurrentlyBorrowed(DocumentId),

    /// 永続化層・カタログの障害
    #[error("Storage error")]
    StorageError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl LendingError {
    /// 呼び出し側がバックオフ付きで再試行してよいか
    pub fn is_retryable(&self) -> bool {
        matches!(self, LendingError::StorageError(_))
    }
}

impl From<RepositoryError> for LendingError {
    /// 不変条件に関わる衝突以外はすべてストレージ障害として扱う
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::ActiveLoanExists(document_id) => {
                LendingError::AlreadyBorrowed(document_id)
            }
            other => LendingError::StorageError(Box::new(other)),
        }
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, LendingError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LoanId;

    #[test]
    fn test_active_loan_conflict_maps_to_already_borrowed() {
        let document_id = DocumentId::try_from(9_i64).unwrap();
        let err = LendingError::from(RepositoryError::ActiveLoanExists(document_id));
        assert!(matches!(err, LendingError::AlreadyBorrowed(id) if id == document_id));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_other_repository_errors_map_to_storage_error() {
        let err = LendingError::from(RepositoryError::LoanNotFound(LoanId::new()));
        assert!(matches!(err, LendingError::StorageError(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_validation_error_maps_to_invalid_argument() {
        let err = LendingError::from(ValidationError::NonPositiveDueDays(0));
        assert!(matches!(err, LendingError::InvalidArgument(_)));
        assert!(!err.is_retryable());
    }
}
