//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid report identifier: {0:?}")]
    InvalidIdentifier(String),

    /// 報告書本体（data.json）が取得できない。部分的な結果は返さない
    #[error("Report data unavailable for {id}: {reason}")]
    DataUnavailable { id: String, reason: String },

    #[error("Report collection unavailable: {0}")]
    CollectionUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Invalid raster: {0}")]
    InvalidRaster(String),

    #[error("Unsupported raster: {0}")]
    UnsupportedRaster(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
