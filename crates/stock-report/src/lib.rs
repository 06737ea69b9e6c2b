//! # Stock Report
//!
//! 讀取端：警示判定、可用庫存彙總、異動匯出

pub mod alert;
pub mod availability;
pub mod export;

// Re-export 主要類型
pub use alert::{AlertEvaluator, AlertLevel, AlertResult, Situation};
pub use availability::{
    AvailabilityAggregator, AvailabilityFilter, AvailabilityPage, AvailabilityRow, PageRequest,
    SortKey, SortSpec, WarehouseScope,
};
pub use export::MovementExport;
