use crate::application::lending::{
    ServiceDependencies, borrow_document as execute_borrow_document, get_lending_status, get_loan,
    list_loans_for_user, list_overdue_loans as execute_list_overdue_loans,
    return_document as execute_return_document,
};
use crate::domain::{DocumentId, LoanId, UserId, commands::ReturnDocument};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use std::sync::Arc;
use uuid::Uuid;

use super::{
    error::ApiError,
    types::{
        BorrowDocumentRequest, DocumentReturnedResponse, DocumentStatusResponse, ListLoansQuery,
        LoanCreatedResponse, LoanResponse,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

// ============================================================================
// Command handlers (POST)
// ============================================================================

/// POST /documents/borrow - 資料を貸し出す
///
/// 強制されるビジネスルール:
/// - 利用者ID・資料IDは正の整数、due_daysは1以上であること
/// - 資料が存在すること
/// - 資料が貸出中でないこと
pub async fn borrow_document(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BorrowDocumentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LoanCreatedResponse>), ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let loan = execute_borrow_document(&state.service_deps, req.to_command()).await?;

    tracing::info!(
        user_id = loan.user_id.value(),
        document_id = loan.document_id.value(),
        loan_id = %loan.id,
        "document borrowed"
    );

    let response = LoanCreatedResponse {
        loan_id: loan.id.value(),
        document_id: loan.document_id.value(),
        user_id: loan.user_id.value(),
        borrowed_at: loan.borrowed_at,
        due_at: loan.due_at,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /documents/:id/return - 資料を返却する
///
/// 延滞中の貸出も返却可能。貸出中でない資料は404。
pub async fn return_document(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<DocumentReturnedResponse>, ApiError> {
    let Path(document_id) = path.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let document_id = DocumentId::try_from(document_id)?;

    let returned =
        execute_return_document(&state.service_deps, ReturnDocument { document_id }).await?;

    tracing::info!(
        user_id = returned.loan.user_id.value(),
        document_id = document_id.value(),
        loan_id = %returned.loan.id,
        "document returned"
    );

    Ok(Json(DocumentReturnedResponse {
        loan_id: returned.loan.id.value(),
        document_id: document_id.value(),
        returned_at: returned.returned_at,
    }))
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /documents/:id/status - 資料の貸出状況
pub async fn get_document_status(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<DocumentStatusResponse>, ApiError> {
    let Path(document_id) = path.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let document_id = DocumentId::try_from(document_id)?;

    let status = get_lending_status(&state.service_deps, document_id).await?;

    Ok(Json(DocumentStatusResponse {
        document_id: document_id.value(),
        availability: status.availability(),
        status,
    }))
}

/// GET /loans/:id - 貸出詳細をIDで取得
///
/// 見つかった場合は貸出情報を返し、見つからない場合は404を返す。
pub async fn get_loan_by_id(
    State(state): State<Arc<AppState>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<LoanResponse>, ApiError> {
    let Path(loan_id) = path.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let loan_id = LoanId::from_uuid(loan_id);
    let now = state.service_deps.clock.now();

    match get_loan(&state.service_deps, loan_id).await? {
        Some(loan) => Ok(Json(LoanResponse::from_record(&loan, now))),
        None => Err(ApiError::NotFound(format!("Loan {} not found", loan_id))),
    }
}

/// GET /loans - 利用者の貸出履歴
///
/// クエリパラメータ:
/// - user_id: 利用者IDでフィルタリング（必須）
pub async fn list_loans(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListLoansQuery>, QueryRejection>,
) -> Result<Json<Vec<LoanResponse>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    // user_idを必須とする
    let user_id = query
        .user_id
        .ok_or_else(|| ApiError::BadRequest("user_id query parameter is required".to_string()))?;
    let user_id = UserId::try_from(user_id)?;

    let now = state.service_deps.clock.now();
    let loans = list_loans_for_user(&state.service_deps, user_id).await?;

    Ok(Json(
        loans
            .iter()
            .map(|loan| LoanResponse::from_record(loan, now))
            .collect(),
    ))
}

/// GET /loans/overdue - 延滞中の貸出一覧
pub async fn list_overdue_loans(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LoanResponse>>, ApiError> {
    let now = state.service_deps.clock.now();
    let loans = execute_list_overdue_loans(&state.service_deps).await?;

    Ok(Json(
        loans
            .iter()
            .map(|loan| LoanResponse::from_record(loan, now))
            .collect(),
    ))
}
