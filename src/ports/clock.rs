use chrono::{DateTime, Utc};

/// 時刻の供給元
///
/// テストで時刻を固定・操作できるように注入する。
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
