//! 庫存政策配置

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 庫存政策
///
/// 兩個參數都是業務上未有定論的啟發式規則，保留為可配置項
/// 而非寫死的常數。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockPolicy {
    /// 是否允許負庫存
    /// - true: 一般異動可使庫存為負值（調撥不受此影響，永遠不得為負）
    /// - false: 異動若使庫存為負則拒絕（預設）
    pub allow_negative_stock: bool,

    /// 危急判定比例：可用庫存低於「最低庫存 × 此比例」視為危急
    /// （預設 0.5，即最低庫存的一半）
    pub critical_ratio: Decimal,
}

impl StockPolicy {
    /// 創建預設政策（不允許負庫存、危急比例 0.5）
    pub fn new() -> Self {
        Self {
            allow_negative_stock: false,
            critical_ratio: Decimal::new(5, 1),
        }
    }

    /// 建構器模式：設置是否允許負庫存
    pub fn with_allow_negative_stock(mut self, allow: bool) -> Self {
        self.allow_negative_stock = allow;
        self
    }

    /// 建構器模式：設置危急判定比例
    pub fn with_critical_ratio(mut self, ratio: Decimal) -> Self {
        self.critical_ratio = ratio;
        self
    }
}

impl Default for StockPolicy {
    fn default() -> Self {
        Self::new()
    }
}
