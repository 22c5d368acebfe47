use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::upstream::PriceRecord;
use crate::utils::{Clock, SystemClock};

/// 单个缓存条目：价格快照加上写入时刻
#[derive(Debug, Clone)]
struct CacheEntry {
    record: PriceRecord,
    stored_at: Instant,
}

/// 进程内价格缓存，按 ID 存放最近一次成功拉取的结果。
/// 新鲜度在读取时判定，过期条目仅被忽略，下次成功拉取时覆盖。
pub struct PriceCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl PriceCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// 只返回仍然新鲜的条目；陈旧条目留在表里等待下次覆盖
    pub fn get(&self, id: &str) -> Option<PriceRecord> {
        let now = self.clock.now();
        let entries = self.entries.lock();
        entries.get(id).and_then(|entry| {
            if now.duration_since(entry.stored_at) < self.ttl {
                Some(entry.record.clone())
            } else {
                None
            }
        })
    }

    /// 无条件覆盖写入，写入时刻取当前时钟
    pub fn put(&self, id: impl Into<String>, record: PriceRecord) {
        let entry = CacheEntry {
            record,
            stored_at: self.clock.now(),
        };
        self.entries.lock().insert(id.into(), entry);
    }

    /// 条目总数，陈旧条目也计入（没有任何淘汰机制）
    pub fn size(&self) -> usize {
        self.entries.lock().len()
    }
}
