use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Availability, LendingStatus, LoanRecord, commands::BorrowDocument};

/// 貸出リクエスト（POST /documents/borrow）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorrowDocumentRequest {
    pub user_id: i64,
    pub document_id: i64,
    pub due_days: i64,
}

impl BorrowDocumentRequest {
    pub fn to_command(&self) -> BorrowDocument {
        BorrowDocument {
            user_id: self.user_id,
            document_id: self.document_id,
            due_days: self.due_days,
        }
    }
}

/// 貸出作成レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanCreatedResponse {
    pub loan_id: Uuid,
    pub document_id: i64,
    pub user_id: i64,
    pub borrowed_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
}

/// 返却レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentReturnedResponse {
    pub loan_id: Uuid,
    pub document_id: i64,
    pub returned_at: DateTime<Utc>,
}

/// 貸出状況レスポンス（GET /documents/:id/status）
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentStatusResponse {
    pub document_id: i64,
    pub availability: Availability,
    pub status: LendingStatus,
}

/// 貸出一覧取得のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct ListLoansQuery {
    /// 利用者IDでフィルタリング
    pub user_id: Option<i64>,
}

/// 貸出レスポンス（GET /loans/:id と GET /loans）
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanResponse {
    pub loan_id: Uuid,
    pub document_id: i64,
    pub user_id: i64,
    pub borrowed_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub status: String,
}

impl LoanResponse {
    /// ステータスは`now`時点で導出する
    pub fn from_record(loan: &LoanRecord, now: DateTime<Utc>) -> Self {
        Self {
            loan_id: loan.id.value(),
            document_id: loan.document_id.value(),
            user_id: loan.user_id.value(),
            borrowed_at: loan.borrowed_at,
            due_at: loan.due_at,
            returned_at: loan.returned_at,
            status: loan.status_at(now).as_str().to_string(),
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
