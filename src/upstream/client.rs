use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::config::Config;

use super::model::{CoinInfo, PriceRecord, SimplePrice};

/// 上游调用失败的分类，编排层按这个映射对外状态码
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("identifier not found upstream")]
    NotFound,
    #[error("upstream provider rate limit hit")]
    RateLimited,
    #[error("upstream request timed out")]
    Timeout,
    #[error("upstream returned HTTP {0}")]
    Status(u16),
    #[error("upstream transport error: {0}")]
    Transport(String),
    #[error("invalid upstream payload: {0}")]
    Parse(String),
}

/// 价格数据源接口，编排逻辑和测试都只面向它
#[async_trait]
pub trait PriceProvider: Send + Sync {
    async fn fetch_one(&self, id: &str) -> Result<PriceRecord, FetchError>;
    async fn fetch_many(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, PriceRecord>, FetchError>;
}

pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    pace_delay: Duration,
}

impl CoinGeckoClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.upstream_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.coingecko_api_url.clone(),
            api_key: config.coingecko_api_key.clone(),
            pace_delay: config.pace_delay(),
        })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let mut request = self.client.get(url).header("Accept", "application/json");
        if let Some(key) = &self.api_key {
            request = request.header("x-cg-demo-api-key", key);
        }

        let response = request.send().await.map_err(classify)?;
        match status_error(response.status()) {
            Some(err) => Err(err),
            None => Ok(response),
        }
    }

    /// 一次查询若干 ID 的美元报价；usd 缺失或非正数的条目直接丢弃，
    /// 绝不会把它们当成零价格返回
    async fn simple_prices(&self, ids: &[String]) -> Result<HashMap<String, f64>, FetchError> {
        let url = format!(
            "{}/simple/price?ids={}&vs_currencies=usd",
            self.base_url,
            ids.join(",")
        );
        tracing::debug!("fetching prices for {} id(s) from upstream", ids.len());

        let response = self.get(&url).await?;
        let parsed: HashMap<String, SimplePrice> = response.json().await.map_err(classify)?;

        Ok(parsed
            .into_iter()
            .filter_map(|(id, price)| price.usd.filter(|usd| *usd > 0.0).map(|usd| (id, usd)))
            .collect())
    }

    async fn coin_info(&self, id: &str) -> Result<CoinInfo, FetchError> {
        let url = format!(
            "{}/coins/{}?localization=false&tickers=false&market_data=false&community_data=false&developer_data=false&sparkline=false",
            self.base_url, id
        );

        let response = self.get(&url).await?;
        response.json().await.map_err(classify)
    }
}

#[async_trait]
impl PriceProvider for CoinGeckoClient {
    async fn fetch_one(&self, id: &str) -> Result<PriceRecord, FetchError> {
        if !is_valid_id(id) {
            return Err(FetchError::NotFound);
        }

        let ids = vec![id.to_string()];
        let mut prices = self.simple_prices(&ids).await?;
        let usd = prices.remove(id).ok_or(FetchError::NotFound)?;

        // 价格和元数据是两个独立接口，中间固定停顿以迁就上游自身的限流
        tokio::time::sleep(self.pace_delay).await;

        let record = match self.coin_info(id).await {
            Ok(info) => PriceRecord::new(info.name, info.symbol, usd),
            Err(err) => {
                tracing::warn!("metadata lookup for {} failed, using id fallback: {}", id, err);
                PriceRecord::fallback(id, usd)
            }
        };
        Ok(record)
    }

    async fn fetch_many(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, PriceRecord>, FetchError> {
        // 字符集之外的 ID 不可能存在于上游，先从这一批里剔除
        let ids: Vec<String> = ids
            .iter()
            .filter(|id| is_valid_id(id.as_str()))
            .cloned()
            .collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        // 所有缺失 ID 合并成一次报价调用，价格接口没返回的 ID 直接掉出结果集
        let prices = self.simple_prices(&ids).await?;
        let resolved: Vec<(String, f64)> = ids
            .iter()
            .filter_map(|id| prices.get(id).map(|usd| (id.clone(), *usd)))
            .collect();
        if resolved.is_empty() {
            return Ok(HashMap::new());
        }

        tokio::time::sleep(self.pace_delay).await;

        // 元数据按 ID 并发拉取，失败的单个 ID 用兜底值，不拖垮整批
        let infos = join_all(resolved.iter().map(|(id, _)| self.coin_info(id))).await;

        let mut records = HashMap::new();
        for ((id, usd), info) in resolved.into_iter().zip(infos) {
            let record = match info {
                Ok(info) => PriceRecord::new(info.name, info.symbol, usd),
                Err(err) => {
                    tracing::warn!(
                        "metadata lookup for {} failed, using id fallback: {}",
                        id,
                        err
                    );
                    PriceRecord::fallback(&id, usd)
                }
            };
            records.insert(id, record);
        }
        Ok(records)
    }
}

// CoinGecko 的 ID 是字母、数字、连字符一类的 slug；字符集之外的 ID
// 拼进 URL 会破坏请求（& 截断查询、# 截断路径），一律按不存在处理
fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}

fn status_error(status: StatusCode) -> Option<FetchError> {
    if status == StatusCode::NOT_FOUND {
        Some(FetchError::NotFound)
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        Some(FetchError::RateLimited)
    } else if !status.is_success() {
        Some(FetchError::Status(status.as_u16()))
    } else {
        None
    }
}

fn classify(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else if err.is_decode() {
        FetchError::Parse(err.to_string())
    } else {
        FetchError::Transport(err.to_string())
    }
}
