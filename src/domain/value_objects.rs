use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::ValidationError;

/// 貸出ID - 貸出記録の識別子
///
/// 生成時に一度だけ割り当てられ、再利用されない（UUID v4）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoanId(Uuid);

impl LoanId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for LoanId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// 資料ID - カタログ管理コンテキストへの参照
///
/// 不変条件：正の整数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct DocumentId(i64);

impl DocumentId {
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for DocumentId {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value <= 0 {
            return Err(ValidationError::InvalidDocumentId(value));
        }
        Ok(Self(value))
    }
}

impl From<DocumentId> for i64 {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// 利用者ID - 利用者管理コンテキストへの参照
///
/// 不変条件：正の整数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for UserId {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value <= 0 {
            return Err(ValidationError::InvalidUserId(value));
        }
        Ok(Self(value))
    }
}

impl From<UserId> for i64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// 貸出期間（日数）
///
/// 不変条件：1日以上`MAX_DAYS`以下。0や負の値は型として作成できないため、
/// `due_at >= borrowed_at` が常に成り立つ。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanPeriod(u32);

impl LoanPeriod {
    /// 貸出期間の上限（約100年）
    pub const MAX_DAYS: u32 = 36_500;

    /// 日数
    pub fn days(&self) -> u32 {
        self.0
    }

    pub fn as_duration(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.0))
    }
}

impl TryFrom<i64> for LoanPeriod {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value <= 0 {
            return Err(ValidationError::NonPositiveDueDays(value));
        }
        match u32::try_from(value) {
            Ok(days) if days <= Self::MAX_DAYS => Ok(Self(days)),
            _ => Err(ValidationError::DueDaysOutOfRange(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loan_id_creation() {
        let id1 = LoanId::new();
        let id2 = LoanId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_loan_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = LoanId::from_uuid(uuid);
        assert_eq!(id.value(), uuid);
    }

    #[test]
    fn test_document_id_rejects_non_positive() {
        assert_eq!(
            DocumentId::try_from(0_i64),
            Err(ValidationError::InvalidDocumentId(0))
        );
        assert_eq!(
            DocumentId::try_from(-3_i64),
            Err(ValidationError::InvalidDocumentId(-3))
        );
        assert_eq!(DocumentId::try_from(9_i64).unwrap().value(), 9);
    }

    #[test]
    fn test_user_id_rejects_non_positive() {
        assert_eq!(UserId::try_from(0_i64), Err(ValidationError::InvalidUserId(0)));
        assert_eq!(UserId::try_from(2_i64).unwrap().value(), 2);
    }

    #[test]
    fn test_loan_period_rejects_zero_and_negative() {
        assert_eq!(
            LoanPeriod::try_from(0_i64),
            Err(ValidationError::NonPositiveDueDays(0))
        );
        assert_eq!(
            LoanPeriod::try_from(-7_i64),
            Err(ValidationError::NonPositiveDueDays(-7))
        );
    }

    #[test]
    fn test_loan_period_rejects_overflow() {
        let too_long = i64::from(u32::MAX) + 1;
        assert_eq!(
            LoanPeriod::try_from(too_long),
            Err(ValidationError::DueDaysOutOfRange(too_long))
        );
    }

    #[test]
    fn test_loan_period_upper_bound() {
        let max = i64::from(LoanPeriod::MAX_DAYS);
        assert_eq!(LoanPeriod::try_from(max).unwrap().days(), LoanPeriod::MAX_DAYS);
        assert_eq!(
            LoanPeriod::try_from(max + 1),
            Err(ValidationError::DueDaysOutOfRange(max + 1))
        );
        assert_eq!(
            LoanPeriod::try_from(200_000_000_i64),
            Err(ValidationError::DueDaysOutOfRange(200_000_000))
        );
    }

    #[test]
    fn test_loan_period_duration() {
        let period = LoanPeriod::try_from(7_i64).unwrap();
        assert_eq!(period.days(), 7);
        assert_eq!(period.as_duration(), chrono::Duration::days(7));
    }

    #[test]
    fn test_document_id_deserialize_validates() {
        let ok: DocumentId = serde_json::from_str("5").unwrap();
        assert_eq!(ok.value(), 5);
        assert!(serde_json::from_str::<DocumentId>("0").is_err());
    }
}
