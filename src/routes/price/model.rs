use std::collections::HashMap;

use crate::cache::PriceCache;
use crate::error::AppError;
use crate::upstream::{FetchError, PriceProvider, PriceRecord};

impl PriceRecord {
    /// 单个 ID 的查询编排：缓存命中直接返回，未命中走上游并写回缓存
    pub async fn resolve(
        cache: &PriceCache,
        upstream: &dyn PriceProvider,
        id: &str,
    ) -> Result<PriceRecord, AppError> {
        if let Some(record) = cache.get(id) {
            tracing::debug!("cache hit for {}", id);
            return Ok(record);
        }

        let record = upstream.fetch_one(id).await?;
        cache.put(id, record.clone());
        Ok(record)
    }

    /// 批量查询编排：先按缓存分流，缺失的 ID 合并成一次批量拉取，
    /// 拉取到的写回缓存后与命中部分合并。始终解析不出的 ID 不报错，
    /// 直接在结果里缺席
    pub async fn resolve_many(
        cache: &PriceCache,
        upstream: &dyn PriceProvider,
        ids: &[String],
    ) -> Result<HashMap<String, PriceRecord>, AppError> {
        let mut results = HashMap::new();
        let mut missing: Vec<String> = Vec::new();

        // 重复 ID 只保留第一次出现
        for id in ids {
            if results.contains_key(id) || missing.contains(id) {
                continue;
            }
            match cache.get(id) {
                Some(record) => {
                    results.insert(id.clone(), record);
                }
                None => missing.push(id.clone()),
            }
        }

        if missing.is_empty() {
            return Ok(results);
        }

        tracing::debug!(
            "bulk lookup: {} cached, {} to fetch",
            results.len(),
            missing.len()
        );

        // 共享的批量调用一旦失败，所有未命中 ID 一起失败；
        // 上游限流对外翻译成 429，其余一律 500
        let fetched = upstream
            .fetch_many(&missing)
            .await
            .map_err(|err| match err {
                FetchError::RateLimited => AppError::UpstreamRateLimited,
                other => AppError::Internal(other.to_string()),
            })?;

        for (id, record) in fetched {
            cache.put(id.clone(), record.clone());
            results.insert(id, record);
        }

        Ok(results)
    }
}
