use serde::{Deserialize, Serialize};

use super::DocumentId;

/// コマンド：資料を貸し出す
///
/// 外側の層から受け取った値をそのまま保持する。
/// 識別子と日数のバリデーションはアプリケーション層で行う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowDocument {
    pub user_id: i64,
    pub document_id: i64,
    pub due_days: i64,
}

/// コマンド：資料を返却する
///
/// 資料IDのみで指定する。貸出中の記録は資料ごとに高々1件なので、
/// 資料IDから返却対象の貸出が一意に決まる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnDocument {
    pub document_id: DocumentId,
}
