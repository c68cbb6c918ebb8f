use crate::domain::DocumentId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// 孤立したエントリを掃除する目安となる登録数
pub const DEFAULT_PRUNE_THRESHOLD: usize = 1024;

type Slot = Arc<AsyncMutex<()>>;

/// 資料ごとの排他制御
///
/// 資料IDをキーに非同期Mutexを遅延生成する。異なる資料同士は競合しない。
/// マップ自体のロックは`.await`をまたいで保持しない。
pub struct DocumentGuards {
    slots: Mutex<HashMap<DocumentId, Slot>>,
    prune_threshold: usize,
}

impl DocumentGuards {
    pub fn new() -> Self {
        Self::with_prune_threshold(DEFAULT_PRUNE_THRESHOLD)
    }

    pub fn with_prune_threshold(prune_threshold: usize) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            prune_threshold: prune_threshold.max(1),
        }
    }

    /// 資料の排他ロックを取得する
    ///
    /// 同じ資料のロックが解放されるまで待機する。
    /// 返されたガードをdropするとロックが解放される。
    pub async fn acquire(self: &Arc<Self>, document_id: DocumentId) -> DocumentGuard {
        let slot = {
            let mut slots = self.slots();
            // 待機中にキャンセルされたタスクが残したエントリを掃除する
            if slots.len() >= self.prune_threshold {
                slots.retain(|_, slot| Arc::strong_count(slot) > 1);
            }
            Arc::clone(
                slots
                    .entry(document_id)
                    .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
            )
        };

        let lock = slot.lock_owned().await;

        DocumentGuard {
            guards: Arc::clone(self),
            document_id,
            lock: Some(lock),
        }
    }

    /// 現在追跡している資料の数
    pub fn len(&self) -> usize {
        self.slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<DocumentId, Slot>> {
        // 保護対象はHashMapの挿入・削除のみで、途中状態でpanicしない
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 誰も参照していなければエントリを削除する
    fn release(&self, document_id: DocumentId) {
        let mut slots = self.slots();
        let idle = slots
            .get(&document_id)
            .is_some_and(|slot| Arc::strong_count(slot) == 1);
        if idle {
            slots.remove(&document_id);
        }
    }
}

impl Default for DocumentGuards {
    fn default() -> Self {
        Self::new()
    }
}

/// 資料の排他ロック
///
/// エラー・panic・キャンセルを含むすべての経路でdrop時に解放される。
pub struct DocumentGuard {
    guards: Arc<DocumentGuards>,
    document_id: DocumentId,
    lock: Option<OwnedMutexGuard<()>>,
}

impl DocumentGuard {
    pub fn document_id(&self) -> DocumentId {
        self.document_id
    }
}

impl Drop for DocumentGuard {
    fn drop(&mut self) {
        // 先にロックを手放し、参照カウントを減らしてから掃除する
        drop(self.lock.take());
        self.guards.release(self.document_id);
    }
}
