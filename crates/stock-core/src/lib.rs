//! # Stock Core
//!
//! 核心資料模型與類型定義

pub mod config;
pub mod movement;
pub mod product;
pub mod registry;
pub mod threshold;
pub mod warehouse;

// Re-export 主要類型
pub use config::StockPolicy;
pub use movement::{MovementKind, StockMovement};
pub use product::Product;
pub use registry::{InMemoryRegistry, StockRegistry};
pub use threshold::{BoundPatch, ThresholdPatch};
pub use warehouse::Warehouse;

use rust_decimal::Decimal;

/// 庫存引擎錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum StockError {
    #[error("無效的數量: {0}")]
    InvalidQuantity(Decimal),

    #[error("庫存不足: 需要 {requested}, 可用 {available}")]
    InsufficientStock {
        requested: Decimal,
        available: Decimal,
    },

    #[error("調撥庫存不足: 需要 {requested}, 可用 {available}, 短缺 {shortfall}")]
    InsufficientStockForTransfer {
        requested: Decimal,
        available: Decimal,
        shortfall: Decimal,
    },

    #[error("無效的上下限範圍: 最高 {maximum} 小於最低 {minimum}")]
    InvalidThresholdRange {
        minimum: Decimal,
        maximum: Decimal,
    },

    #[error("無效的上下限數值: {0}")]
    InvalidThresholdValue(Decimal),

    #[error("找不到產品: {0}")]
    ProductNotFound(String),

    #[error("找不到倉庫: {0}")]
    WarehouseNotFound(String),

    #[error("倉庫未啟用: {0}")]
    InactiveWarehouse(String),

    #[error("來源與目的倉庫相同: {0}")]
    SameWarehouseTransfer(String),

    #[error("調撥類異動必須透過調撥作業執行: {0}")]
    TransferKindNotAllowed(String),
}

pub type Result<T> = std::result::Result<T, StockError>;
