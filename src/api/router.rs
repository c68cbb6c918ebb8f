use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, borrow_document, get_document_status, get_loan_by_id, list_loans,
    list_overdue_loans, return_document,
};

/// 貸出APIのルーターを作成する
///
/// コマンド（書き込み）:
/// - POST /documents/borrow - 資料を貸し出す
/// - POST /documents/:id/return - 資料を返却する
///
/// クエリ（読み取り）:
/// - GET /documents/:id/status - 資料の貸出状況
/// - GET /loans?user_id= - 利用者の貸出履歴
/// - GET /loans/overdue - 延滞中の貸出一覧
/// - GET /loans/:id - 貸出詳細
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Command endpoints (Write operations)
        .route("/documents/borrow", post(borrow_document))
        .route("/documents/:id/return", post(return_document))
        // Query endpoints (Read operations)
        .route("/documents/:id/status", get(get_document_status))
        .route("/loans", get(list_loans))
        .route("/loans/overdue", get(list_overdue_loans))
        .route("/loans/:id", get(get_loan_by_id))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
