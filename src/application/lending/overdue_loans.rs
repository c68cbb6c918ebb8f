use crate::domain::LoanRecord;

use super::errors::Result;
use super::lending_service::ServiceDependencies;

/// 延滞中の貸出一覧（読み取り専用）
///
/// 返却期限（due_at）を過ぎた未返却の貸出を、期限の古い順に返す。
///
/// 延滞は保存された状態ではなく現在時刻からの導出なので、
/// 延滞を記録するバッチ処理や書き込みは行わない。
/// 返却されればその時点で一覧から外れる。
pub async fn list_overdue_loans(deps: &ServiceDependencies) -> Result<Vec<LoanRecord>> {
    let now = deps.clock.now();

    let mut loans = deps.loan_repository.find_overdue(now).await?;

    // アダプターの実装によらず導出ルールと一致させる
    loans.retain(|loan| crate::domain::loan::is_overdue(loan.due_at, loan.returned_at, now));
    loans.sort_by_key(|loan| loan.due_at);

    Ok(loans)
}
