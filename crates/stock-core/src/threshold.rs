//! 庫存上下限配置

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Result, StockError};

/// 單一界限的修改指令
///
/// 三態必須能區分：不動、清除、設置新值。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundPatch {
    /// 保留原值
    Keep,
    /// 清除設定
    Clear,
    /// 設置新值
    Set(Decimal),
}

impl BoundPatch {
    /// 套用到現有設定值
    pub fn apply(&self, current: Option<Decimal>) -> Option<Decimal> {
        match self {
            BoundPatch::Keep => current,
            BoundPatch::Clear => None,
            BoundPatch::Set(value) => Some(*value),
        }
    }
}

/// 上下限修改指令（最低與最高各自獨立）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdPatch {
    /// 最低庫存
    pub minimum: BoundPatch,

    /// 最高庫存
    pub maximum: BoundPatch,
}

impl ThresholdPatch {
    /// 創建空的修改指令（兩者皆不動）
    pub fn new() -> Self {
        Self {
            minimum: BoundPatch::Keep,
            maximum: BoundPatch::Keep,
        }
    }

    /// 建構器模式：設置最低庫存
    pub fn set_minimum(mut self, value: Decimal) -> Self {
        self.minimum = BoundPatch::Set(value);
        self
    }

    /// 建構器模式：清除最低庫存
    pub fn clear_minimum(mut self) -> Self {
        self.minimum = BoundPatch::Clear;
        self
    }

    /// 建構器模式：設置最高庫存
    pub fn set_maximum(mut self, value: Decimal) -> Self {
        self.maximum = BoundPatch::Set(value);
        self
    }

    /// 建構器模式：清除最高庫存
    pub fn clear_maximum(mut self) -> Self {
        self.maximum = BoundPatch::Clear;
        self
    }

    /// 檢查是否為無效修改（兩者皆不動）
    pub fn is_noop(&self) -> bool {
        self.minimum == BoundPatch::Keep && self.maximum == BoundPatch::Keep
    }
}

impl Default for ThresholdPatch {
    fn default() -> Self {
        Self::new()
    }
}

/// 驗證套用後的上下限組合
///
/// 數值必須 ≥ 0；兩者皆設定時最高不得小於最低。
/// Decimal 不存在 NaN 與無窮大，有限性由類型保證。
pub fn validate_bounds(minimum: Option<Decimal>, maximum: Option<Decimal>) -> Result<()> {
    for value in [minimum, maximum].into_iter().flatten() {
        if value < Decimal::ZERO {
            return Err(StockError::InvalidThresholdValue(value));
        }
    }

    if let (Some(min), Some(max)) = (minimum, maximum) {
        if max < min {
            return Err(StockError::InvalidThresholdRange {
                minimum: min,
                maximum: max,
            });
        }
    }

    Ok(())
}
