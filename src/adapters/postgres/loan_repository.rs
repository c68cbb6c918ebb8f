use crate::domain::{DocumentId, LoanId, LoanRecord, UserId};
use crate::ports::loan_repository::{
    LoanRepository as LoanRepositoryTrait, RepositoryError, Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};

/// 未返却の貸出を資料ごとに1件に制限する部分一意インデックス
pub const ONE_ACTIVE_LOAN_CONSTRAINT: &str = "loans_one_active_per_document";

const LOAN_COLUMNS: &str = "id, document_id, user_id, borrowed_at, due_at, returned_at";

fn storage_error(err: impl std::error::Error + Send + Sync + 'static) -> RepositoryError {
    RepositoryError::Storage(Box::new(err))
}

fn invalid_data(message: String) -> RepositoryError {
    storage_error(std::io::Error::new(std::io::ErrorKind::InvalidData, message))
}

/// PostgreSQLの行データをLoanRecordに変換する
///
/// 識別子は値オブジェクトの不変条件（正の整数）で検証する。
fn map_row_to_loan(row: &PgRow) -> Result<LoanRecord> {
    let document_id: i64 = row.try_get("document_id").map_err(storage_error)?;
    let user_id: i64 = row.try_get("user_id").map_err(storage_error)?;

    Ok(LoanRecord {
        id: LoanId::from_uuid(row.try_get("id").map_err(storage_error)?),
        document_id: DocumentId::try_from(document_id)
            .map_err(|e| invalid_data(e.to_string()))?,
        user_id: UserId::try_from(user_id).map_err(|e| invalid_data(e.to_string()))?,
        borrowed_at: row.try_get("borrowed_at").map_err(storage_error)?,
        due_at: row.try_get("due_at").map_err(storage_error)?,
        returned_at: row.try_get("returned_at").map_err(storage_error)?,
    })
}

/// LoanRepositoryのPostgreSQL実装
///
/// 単一貸出の不変条件は部分一意インデックスで保証する。
/// 複数のサービスプロセスが同じデータベースを共有しても、
/// 同じ資料への同時貸出は片方がActiveLoanExistsになる。
pub struct LoanRepository {
    pool: PgPool,
}

impl LoanRepository {
    /// PostgreSQLコネクションプールから新しいLoanRepositoryを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoanRepositoryTrait for LoanRepository {
    /// 貸出記録を追加する
    ///
    /// 単一のINSERT文なので、確認と追加はインデックスによって原子的に行われる。
    async fn insert(&self, loan: LoanRecord) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO loans (id, document_id, user_id, borrowed_at, due_at, returned_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(loan.id.value())
        .bind(loan.document_id.value())
        .bind(loan.user_id.value())
        .bind(loan.borrowed_at)
        .bind(loan.due_at)
        .bind(loan.returned_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err))
                if db_err.constraint() == Some(ONE_ACTIVE_LOAN_CONSTRAINT) =>
            {
                tracing::debug!(
                    document_id = loan.document_id.value(),
                    "insert rejected by {}",
                    ONE_ACTIVE_LOAN_CONSTRAINT
                );
                Err(RepositoryError::ActiveLoanExists(loan.document_id))
            }
            Err(e) => Err(storage_error(e)),
        }
    }

    async fn find_active_by_document(
        &self,
        document_id: DocumentId,
    ) -> Result<Option<LoanRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {LOAN_COLUMNS} FROM loans WHERE document_id = $1 AND returned_at IS NULL"
        ))
        .bind(document_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        row.as_ref().map(map_row_to_loan).transpose()
    }

    /// 未返却の記録を優先し、なければ返却日時の最も新しい記録
    async fn find_latest_by_document(
        &self,
        document_id: DocumentId,
    ) -> Result<Option<LoanRecord>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {LOAN_COLUMNS}
            FROM loans
            WHERE document_id = $1
            ORDER BY returned_at DESC NULLS FIRST, borrowed_at DESC
            LIMIT 1
            "#
        ))
        .bind(document_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        row.as_ref().map(map_row_to_loan).transpose()
    }

    /// 返却日時を書き込む
    ///
    /// `returned_at IS NULL`を条件にした更新なので、返却日時は一度しか書き込まれない。
    async fn mark_returned(
        &self,
        loan_id: LoanId,
        returned_at: DateTime<Utc>,
    ) -> Result<LoanRecord> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE loans
            SET returned_at = $2
            WHERE id = $1 AND returned_at IS NULL
            RETURNING {LOAN_COLUMNS}
            "#
        ))
        .bind(loan_id.value())
        .bind(returned_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        if let Some(row) = row {
            return map_row_to_loan(&row);
        }

        // 更新対象がない：返却済みか存在しないかを区別する
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM loans WHERE id = $1)")
            .bind(loan_id.value())
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)?;

        if exists {
            Err(RepositoryError::AlreadyReturned(loan_id))
        } else {
            Err(RepositoryError::LoanNotFound(loan_id))
        }
    }

    async fn get_by_id(&self, loan_id: LoanId) -> Result<Option<LoanRecord>> {
        let row = sqlx::query(&format!("SELECT {LOAN_COLUMNS} FROM loans WHERE id = $1"))
            .bind(loan_id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        row.as_ref().map(map_row_to_loan).transpose()
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<LoanRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {LOAN_COLUMNS} FROM loans WHERE user_id = $1 ORDER BY borrowed_at DESC"
        ))
        .bind(user_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter().map(map_row_to_loan).collect()
    }

    async fn find_overdue(&self, now: DateTime<Utc>) -> Result<Vec<LoanRecord>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {LOAN_COLUMNS}
            FROM loans
            WHERE returned_at IS NULL AND due_at < $1
            ORDER BY due_at ASC
            "#
        ))
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter().map(map_row_to_loan).collect()
    }
}
