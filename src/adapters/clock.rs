use crate::ports::Clock;
use chrono::{DateTime, SubsecRound, Utc};

/// システム時計
///
/// PostgreSQLのTIMESTAMPTZはマイクロ秒精度なので、保存前後で値が変わらないよう
/// マイクロ秒に切り捨てて返す。
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(6)
    }
}
