//! # Stock Ledger
//!
//! 庫存異動引擎：帳冊、單筆異動、調撥、批次更新、上下限設定

pub mod engine;
pub mod ledger;
pub mod mutation;
pub mod transfer;

// Re-export 主要類型
pub use engine::{MassUpdateRow, MutationRequest, StockEngine};
pub use ledger::MovementLedger;
pub use mutation::{MutationCalculator, MutationDelta};
pub use transfer::{TransferPlan, TransferPlanner};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use stock_core::{Product, StockError, StockMovement};

/// 單筆異動結果
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    /// 更新後的產品狀態
    pub product: Product,

    /// 新增的異動紀錄
    pub movement: StockMovement,
}

/// 調撥結果
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    /// 更新後的產品狀態
    pub product: Product,

    /// 成對的異動紀錄（出庫在前、入庫在後）
    pub movements: [StockMovement; 2],
}

/// 批次更新的單列錯誤
#[derive(Debug)]
pub struct RowError {
    /// 列序號（從 0 起算）
    pub index: usize,

    /// 產品ID
    pub product_id: String,

    /// 倉庫ID
    pub warehouse_id: String,

    /// 失敗原因
    pub error: StockError,
}

/// 批次更新報告
///
/// 列與列之間沒有交易性：失敗列被記錄後繼續處理下一列。
#[derive(Debug, Default)]
pub struct MassUpdateReport {
    /// 成功產生的異動
    pub movements: Vec<StockMovement>,

    /// 逐列錯誤
    pub row_errors: Vec<RowError>,

    /// 是否因取消而提前結束
    pub cancelled: bool,
}

impl MassUpdateReport {
    /// 創建空的報告
    pub fn empty() -> Self {
        Self::default()
    }

    /// 成功列數
    pub fn applied(&self) -> usize {
        self.movements.len()
    }

    /// 失敗列數
    pub fn skipped(&self) -> usize {
        self.row_errors.len()
    }

    /// 是否為部分成功
    pub fn is_partial(&self) -> bool {
        !self.row_errors.is_empty() && !self.movements.is_empty()
    }
}

/// 協作式取消旗標
///
/// 批次更新只在列與列之間檢查，不會中斷進行中的單列。
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// 創建未取消的旗標
    pub fn new() -> Self {
        Self::default()
    }

    /// 要求取消
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// 檢查是否已要求取消
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
