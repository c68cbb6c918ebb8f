use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DocumentId, LoanId, LoanPeriod, ReturnLoanError, UserId, ValidationError};

/// 貸出ステータス
///
/// 永続化されない。`returned_at`・`due_at`・現在時刻から読み取り時に導出される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    /// 貸出中
    Active,
    /// 延滞中（貸出中かつ返却期限を過ぎている）
    Overdue,
    /// 返却済み
    Returned,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "active",
            LoanStatus::Overdue => "overdue",
            LoanStatus::Returned => "returned",
        }
    }
}

/// 貸出記録 - 1資料・1利用者の貸出から返却までの1回分
///
/// 生成後に変更されるのは`returned_at`のみで、それも一度だけ。
/// 削除はされない（監査証跡）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub id: LoanId,
    pub document_id: DocumentId,
    pub user_id: UserId,
    pub borrowed_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
}

impl LoanRecord {
    /// 返却されていない貸出か
    pub fn is_active(&self) -> bool {
        self.returned_at.is_none()
    }

    /// 指定時刻におけるステータス
    pub fn status_at(&self, now: DateTime<Utc>) -> LoanStatus {
        match self.returned_at {
            Some(_) => LoanStatus::Returned,
            None if is_overdue(self.due_at, self.returned_at, now) => LoanStatus::Overdue,
            None => LoanStatus::Active,
        }
    }
}

/// 返却の結果
///
/// `returned_at`は台帳に書き込んだ返却日時そのもの。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnedLoan {
    pub loan: LoanRecord,
    pub returned_at: DateTime<Utc>,
}

/// 資料の貸出状況（GetStatusの結果）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LendingStatus {
    /// 一度も貸し出されていない
    NeverBorrowed,
    /// 貸出中
    Borrowed {
        due_at: DateTime<Utc>,
        overdue: bool,
    },
    /// 直近の貸出は返却済み
    Returned { returned_at: DateTime<Utc> },
}

impl LendingStatus {
    /// 資料単位の状態機械上の状態
    pub fn availability(&self) -> Availability {
        match self {
            LendingStatus::NeverBorrowed | LendingStatus::Returned { .. } => {
                Availability::Available
            }
            LendingStatus::Borrowed { overdue: false, .. } => Availability::Borrowed,
            LendingStatus::Borrowed { overdue: true, .. } => Availability::Overdue,
        }
    }
}

/// 資料の状態
///
/// Available → Borrowed → (時間経過で) Overdue → 返却で Available。
/// 終端状態はない。永続化される遷移は返却（returned_atの書き込み）のみ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    Borrowed,
    Overdue,
}

/// 純粋関数：資料を貸し出す
///
/// `due_at = borrowed_at + 貸出期間`。日時の表現範囲を超える場合はエラー。
/// 副作用なし。新しいLoanRecordを返す。
pub fn borrow(
    document_id: DocumentId,
    user_id: UserId,
    period: LoanPeriod,
    borrowed_at: DateTime<Utc>,
) -> Result<LoanRecord, ValidationError> {
    let due_at = borrowed_at
        .checked_add_signed(period.as_duration())
        .ok_or(ValidationError::DueDaysOutOfRange(i64::from(period.days())))?;

    Ok(LoanRecord {
        id: LoanId::new(),
        document_id,
        user_id,
        borrowed_at,
        due_at,
        returned_at: None,
    })
}

/// 純粋関数：資料を返却する
///
/// 延滞していても返却は受け付ける。
/// 副作用なし。returned_atを設定したLoanRecordを返す。
pub fn return_loan(
    loan: &LoanRecord,
    returned_at: DateTime<Utc>,
) -> Result<LoanRecord, ReturnLoanError> {
    if !loan.is_active() {
        return Err(ReturnLoanError::AlreadyReturned(loan.id));
    }

    Ok(LoanRecord {
        returned_at: Some(returned_at),
        ..loan.clone()
    })
}

/// 純粋関数：延滞判定
pub fn is_overdue(
    due_at: DateTime<Utc>,
    returned_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    returned_at.is_none() && now > due_at
}

/// 純粋関数：資料の直近の貸出記録から貸出状況を求める
///
/// `latest`は貸出中の記録があればそれ、なければ最後に返却された記録。
pub fn lending_status(latest: Option<&LoanRecord>, now: DateTime<Utc>) -> LendingStatus {
    match latest {
        None => LendingStatus::NeverBorrowed,
        Some(loan) => match loan.returned_at {
            Some(returned_at) => LendingStatus::Returned { returned_at },
            None => LendingStatus::Borrowed {
                due_at: loan.due_at,
                overdue: is_overdue(loan.due_at, None, now),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap()
    }

    fn new_loan(days: i64) -> LoanRecord {
        borrow(
            DocumentId::try_from(5_i64).unwrap(),
            UserId::try_from(1_i64).unwrap(),
            LoanPeriod::try_from(days).unwrap(),
            t0(),
        )
        .unwrap()
    }

    #[test]
    fn test_borrow_sets_due_date_from_period() {
        let loan = new_loan(7);

        assert_eq!(loan.borrowed_at, t0());
        assert_eq!(loan.due_at, t0() + Duration::days(7));
        assert_eq!(loan.returned_at, None);
        assert_eq!(loan.document_id.value(), 5);
        assert_eq!(loan.user_id.value(), 1);
        assert!(loan.due_at >= loan.borrowed_at);
    }

    #[test]
    fn test_borrow_generates_distinct_ids() {
        assert_ne!(new_loan(7).id, new_loan(7).id);
    }

    #[test]
    fn test_borrow_rejects_due_date_beyond_calendar() {
        let period = LoanPeriod::try_from(7_i64).unwrap();
        let result = borrow(
            DocumentId::try_from(5_i64).unwrap(),
            UserId::try_from(1_i64).unwrap(),
            period,
            DateTime::<Utc>::MAX_UTC - Duration::days(1),
        );
        assert!(matches!(result, Err(ValidationError::DueDaysOutOfRange(_))));
    }

    #[test]
    fn test_return_loan_sets_returned_at() {
        let loan = new_loan(7);
        let returned_at = t0() + Duration::days(3);

        let returned = return_loan(&loan, returned_at).unwrap();

        assert_eq!(returned.returned_at, Some(returned_at));
        assert_eq!(returned.id, loan.id);
        assert_eq!(returned.due_at, loan.due_at);
    }

    #[test]
    fn test_return_loan_accepts_overdue_loan() {
        let loan = new_loan(7);
        let returned_at = t0() + Duration::days(30);

        let returned = return_loan(&loan, returned_at).unwrap();
        assert_eq!(returned.status_at(returned_at), LoanStatus::Returned);
    }

    #[test]
    fn test_return_loan_fails_when_already_returned() {
        let loan = new_loan(7);
        let returned = return_loan(&loan, t0() + Duration::days(1)).unwrap();

        let result = return_loan(&returned, t0() + Duration::days(2));
        assert_eq!(result, Err(ReturnLoanError::AlreadyReturned(loan.id)));
    }

    #[test]
    fn test_is_overdue_boundary() {
        let due_at = t0() + Duration::days(7);

        assert!(!is_overdue(due_at, None, due_at - Duration::seconds(1)));
        // 期限ちょうどはまだ延滞ではない
        assert!(!is_overdue(due_at, None, due_at));
        assert!(is_overdue(due_at, None, due_at + Duration::seconds(1)));
        assert!(!is_overdue(
            due_at,
            Some(due_at + Duration::days(1)),
            due_at + Duration::days(2)
        ));
    }

    #[test]
    fn test_status_at_transitions_with_time() {
        let loan = new_loan(7);

        assert_eq!(loan.status_at(t0() + Duration::days(1)), LoanStatus::Active);
        assert_eq!(loan.status_at(t0() + Duration::days(8)), LoanStatus::Overdue);

        let returned = return_loan(&loan, t0() + Duration::days(9)).unwrap();
        assert_eq!(
            returned.status_at(t0() + Duration::days(10)),
            LoanStatus::Returned
        );
    }

    #[test]
    fn test_lending_status_never_borrowed() {
        let status = lending_status(None, t0());
        assert_eq!(status, LendingStatus::NeverBorrowed);
        assert_eq!(status.availability(), Availability::Available);
    }

    #[test]
    fn test_lending_status_borrowed_and_overdue() {
        let loan = new_loan(7);

        let before = lending_status(Some(&loan), t0() + Duration::days(6));
        assert_eq!(
            before,
            LendingStatus::Borrowed {
                due_at: loan.due_at,
                overdue: false
            }
        );
        assert_eq!(before.availability(), Availability::Borrowed);

        let after = lending_status(Some(&loan), t0() + Duration::days(8));
        assert_eq!(
            after,
            LendingStatus::Borrowed {
                due_at: loan.due_at,
                overdue: true
            }
        );
        assert_eq!(after.availability(), Availability::Overdue);
    }

    #[test]
    fn test_lending_status_returned() {
        let loan = new_loan(7);
        let returned_at = t0() + Duration::days(2);
        let returned = return_loan(&loan, returned_at).unwrap();

        let status = lending_status(Some(&returned), t0() + Duration::days(20));
        assert_eq!(status, LendingStatus::Returned { returned_at });
        assert_eq!(status.availability(), Availability::Available);
    }

    #[test]
    fn test_lending_status_serializes_with_state_tag() {
        let json = serde_json::to_value(LendingStatus::NeverBorrowed).unwrap();
        assert_eq!(json, serde_json::json!({ "state": "never_borrowed" }));
    }
}
