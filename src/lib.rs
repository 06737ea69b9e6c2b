//! # Stock
//!
//! 多倉庫庫存帳冊與可用庫存引擎

// Re-export 主要類型
pub use stock_core::{
    BoundPatch, InMemoryRegistry, MovementKind, Product, Result, StockError, StockMovement,
    StockPolicy, StockRegistry, ThresholdPatch, Warehouse,
};
pub use stock_ledger::{
    CancelFlag, MassUpdateReport, MassUpdateRow, MovementLedger, MutationCalculator,
    MutationDelta, MutationOutcome, MutationRequest, RowError, StockEngine, TransferOutcome,
    TransferPlan, TransferPlanner,
};
pub use stock_report::{
    AlertEvaluator, AlertLevel, AlertResult, AvailabilityAggregator, AvailabilityFilter,
    AvailabilityPage, AvailabilityRow, MovementExport, PageRequest, Situation, SortKey, SortSpec,
    WarehouseScope,
};
