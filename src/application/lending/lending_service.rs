use crate::domain::{
    self, DocumentId, LendingStatus, LoanId, LoanPeriod, LoanRecord, ReturnedLoan, UserId,
    commands::{BorrowDocument, ReturnDocument},
};
use crate::ports::*;
use std::sync::Arc;

use super::document_guard::DocumentGuards;
use super::errors::{LendingError, Result};

/// サービスの依存関係
///
/// 振る舞いは持たず、各サービス関数に明示的に渡す。
/// 永続化はグローバルな状態ではなく注入されたポートとして扱うので、
/// テストではインメモリ実装に差し替えられる。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub loan_repository: Arc<dyn LoanRepository>,
    pub document_catalog: Arc<dyn DocumentCatalog>,
    pub clock: Arc<dyn Clock>,
    pub document_guards: Arc<DocumentGuards>,
}

impl ServiceDependencies {
    pub fn new(
        loan_repository: Arc<dyn LoanRepository>,
        document_catalog: Arc<dyn DocumentCatalog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            loan_repository,
            document_catalog,
            clock,
            document_guards: Arc::new(DocumentGuards::new()),
        }
    }

    pub fn with_document_guards(mut self, document_guards: Arc<DocumentGuards>) -> Self {
        self.document_guards = document_guards;
        self
    }
}

/// 資料を貸し出す
///
/// ビジネスルール：
/// - 利用者ID・資料IDは正の整数、貸出日数は1日以上であること
/// - 資料がカタログに存在すること
/// - 資料に未返却の貸出がないこと（資料ごとに貸出中は高々1件）
///
/// カタログの確認は資料ロックの取得前に行い、ロックを外部呼び出しの間保持しない。
/// 未返却貸出の確認と記録の追加は資料ロックの内側で1つの単位として実行される。
///
/// 呼び出し側がキャンセルした場合：ロック待ちの間なら何も書き込まれない。
/// 書き込みは1回の原子的な追加なので、途中まで書かれた状態は残らない。
/// ロックはどの経路でも解放される。
///
/// # 戻り値
/// 作成された貸出記録（書き込んだ内容そのもので、読み直しはしない）
///
/// # エラー
/// - InvalidArgument: 入力値が不正（ストレージにはアクセスしない）
/// - DocumentNotFound: 資料が存在しない
/// - AlreadyBorrowed: 資料は貸出中
/// - StorageError: 永続化・カタログの障害
pub async fn borrow_document(
    deps: &ServiceDependencies,
    cmd: BorrowDocument,
) -> Result<LoanRecord> {
    // 1. 入力値のバリデーション
    let user_id = UserId::try_from(cmd.user_id)?;
    let document_id = DocumentId::try_from(cmd.document_id)?;
    let period = LoanPeriod::try_from(cmd.due_days)?;

    // 2. 資料の存在確認
    let exists = deps
        .document_catalog
        .exists(document_id)
        .await
        .map_err(LendingError::StorageError)?;

    if !exists {
        return Err(LendingError::DocumentNotFound(document_id));
    }

    // 3. 資料ロックの内側で確認と追加
    let _guard = deps.document_guards.acquire(document_id).await;

    if deps
        .loan_repository
        .find_active_by_document(document_id)
        .await?
        .is_some()
    {
        return Err(LendingError::AlreadyBorrowed(document_id));
    }

    let loan = domain::loan::borrow(document_id, user_id, period, deps.clock.now())?;

    // 別プロセスとの競合はストレージの一意制約でActiveLoanExistsになる
    deps.loan_repository.insert(loan.clone()).await?;

    Ok(loan)
}

/// 資料を返却する
///
/// 資料の未返却の貸出にreturned_atを書き込む。延滞していても受け付ける。
/// 2回目の呼び出しは成功ではなくNotCurrentlyBorrowedになるので、
/// 呼び出し側は「返却済み」と「今回返却した」を区別できる。
///
/// # 戻り値
/// 返却済みになった貸出記録と、書き込んだ返却日時
///
/// # エラー
/// - NotCurrentlyBorrowed: 資料に未返却の貸出がない
/// - StorageError: 永続化の障害
pub async fn return_document(
    deps: &ServiceDependencies,
    cmd: ReturnDocument,
) -> Result<ReturnedLoan> {
    let document_id = cmd.document_id;
    let _guard = deps.document_guards.acquire(document_id).await;

    let active = deps
        .loan_repository
        .find_active_by_document(document_id)
        .await?
        .ok_or(LendingError::NotCurrentlyBorrowed(document_id))?;

    let returned_at = deps.clock.now();
    domain::loan::return_loan(&active, returned_at)
        .map_err(|_| LendingError::NotCurrentlyBorrowed(document_id))?;

    match deps
        .loan_repository
        .mark_returned(active.id, returned_at)
        .await
    {
        Ok(loan) => Ok(ReturnedLoan { loan, returned_at }),
        // 別プロセスが先に返却した
        Err(RepositoryError::AlreadyReturned(_) | RepositoryError::LoanNotFound(_)) => {
            Err(LendingError::NotCurrentlyBorrowed(document_id))
        }
        Err(e) => Err(e.into()),
    }
}

/// 資料の貸出状況を取得する
///
/// 読み取り専用。資料ロックは取得しない。
/// 延滞かどうかは保存せず、現在時刻から都度判定する。
pub async fn get_lending_status(
    deps: &ServiceDependencies,
    document_id: DocumentId,
) -> Result<LendingStatus> {
    let latest = deps
        .loan_repository
        .find_latest_by_document(document_id)
        .await?;

    Ok(domain::loan::lending_status(latest.as_ref(), deps.clock.now()))
}

/// IDで貸出記録を取得する
pub async fn get_loan(deps: &ServiceDependencies, loan_id: LoanId) -> Result<Option<LoanRecord>> {
    Ok(deps.loan_repository.get_by_id(loan_id).await?)
}

/// 利用者の貸出履歴を新しい順に取得する
pub async fn list_loans_for_user(
    deps: &ServiceDependencies,
    user_id: UserId,
) -> Result<Vec<LoanRecord>> {
    Ok(deps.loan_repository.find_by_user(user_id).await?)
}
