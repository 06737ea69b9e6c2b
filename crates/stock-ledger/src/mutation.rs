//! 單筆異動計算

use rust_decimal::Decimal;

use stock_core::{MovementKind, Result, StockError};

/// 異動前後數量
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationDelta {
    /// 異動前數量
    pub stock_before: Decimal,
    /// 異動後數量
    pub stock_after: Decimal,
    /// 符號化差量（加量為正，減量為負）
    pub signed_delta: Decimal,
}

/// 異動計算器
///
/// 純計算：所有驗證在任何狀態被修改之前完成。
pub struct MutationCalculator;

impl MutationCalculator {
    /// 計算異動前後數量
    ///
    /// # 參數
    /// * `allow_negative_stock` - 是否允許異動後為負值
    ///   - false: `after < 0` 時拒絕（預設政策）
    ///   - true: 允許負值（調撥不走此路徑，永遠不得為負）
    pub fn compute(
        stock_before: Decimal,
        kind: MovementKind,
        quantity: Decimal,
        allow_negative_stock: bool,
    ) -> Result<MutationDelta> {
        if kind.is_transfer() {
            return Err(StockError::TransferKindNotAllowed(
                kind.as_str().to_string(),
            ));
        }

        if quantity <= Decimal::ZERO {
            return Err(StockError::InvalidQuantity(quantity));
        }

        let signed_delta = kind.signed(quantity);
        let stock_after = stock_before + signed_delta;

        if !allow_negative_stock && stock_after < Decimal::ZERO {
            return Err(StockError::InsufficientStock {
                requested: quantity,
                available: stock_before,
            });
        }

        Ok(MutationDelta {
            stock_before,
            stock_after,
            signed_delta,
        })
    }
}
