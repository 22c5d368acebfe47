use serde::{Deserialize, Serialize};

/// 一个币种的报价快照，构造后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub name: String,
    pub symbol: String,
    pub price: f64,
}

impl PriceRecord {
    /// symbol 统一在这里转大写，其他地方不再做归一化
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into().to_uppercase(),
            price,
        }
    }

    /// 元数据查询失败时用 ID 本身兜底
    pub fn fallback(id: &str, price: f64) -> Self {
        Self::new(id, id, price)
    }
}

/// simple/price 接口里单个币种的报价，usd 字段可能缺失
#[derive(Debug, Deserialize)]
pub struct SimplePrice {
    pub usd: Option<f64>,
}

/// coins/{id} 接口返回的元数据，只取用到的两个字段
#[derive(Debug, Deserialize)]
pub struct CoinInfo {
    pub name: String,
    pub symbol: String,
}
