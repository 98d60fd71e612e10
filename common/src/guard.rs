//! 古いレスポンスの破棄
//!
//! 画面遷移後に遅れて届いた取得結果で状態を上書きしないよう、取得ごとに
//! チケットを発行する。新しいチケットの発行か `cancel_all` で古いチケットは無効になる。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct RequestGuard {
    generation: Arc<AtomicU64>,
}

#[derive(Debug, Clone)]
pub struct RequestTicket {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl RequestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新しい取得を開始。以前のチケットは無効になる
    pub fn issue(&self) -> RequestTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        RequestTicket {
            generation,
            current: Arc::clone(&self.generation),
        }
    }

    /// 画面の破棄時に呼ぶ。発行済みチケットはすべて無効
    pub fn cancel_all(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

impl RequestTicket {
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }

    /// 有効なチケットの場合のみ値を通す
    pub fn accept<T>(&self, value: T) -> Option<T> {
        self.is_current().then_some(value)
    }
}
