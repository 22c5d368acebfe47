use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{AppState, error::AppError, upstream::PriceRecord};

/// 查询单个币种的当前报价
#[axum::debug_handler]
pub async fn get_price(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PriceRecord>, AppError> {
    let record = PriceRecord::resolve(&state.cache, state.upstream.as_ref(), &id).await?;
    Ok(Json(record))
}

/// 查询多个币种的当前报价，路径参数是逗号分隔的 ID 列表
#[axum::debug_handler]
pub async fn get_prices(
    State(state): State<AppState>,
    Path(ids): Path<String>,
) -> Result<Json<HashMap<String, PriceRecord>>, AppError> {
    let ids: Vec<String> = ids
        .split(',')
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect();

    let records = PriceRecord::resolve_many(&state.cache, state.upstream.as_ref(), &ids).await?;
    Ok(Json(records))
}
