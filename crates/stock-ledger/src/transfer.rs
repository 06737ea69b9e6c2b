//! 調撥計劃

use rust_decimal::Decimal;
use uuid::Uuid;

use stock_core::{MovementKind, Product, Result, StockError, StockMovement, Warehouse};

/// 調撥分錄的原因代碼
pub const TRANSFER_REASON: &str = "TRANSFER";

/// 調撥計劃
///
/// 兩側的新數量與成對分錄先行算出；呼叫端在全部驗證通過後
/// 才一次套用，失敗的調撥不留下任何可見變更。
#[derive(Debug, Clone)]
pub struct TransferPlan {
    /// 來源倉庫ID
    pub source_warehouse_id: String,
    /// 目的倉庫ID
    pub dest_warehouse_id: String,
    /// 來源異動前數量
    pub source_before: Decimal,
    /// 來源異動後數量
    pub source_after: Decimal,
    /// 目的異動前數量
    pub dest_before: Decimal,
    /// 目的異動後數量
    pub dest_after: Decimal,
    /// 出庫分錄
    pub movement_out: StockMovement,
    /// 入庫分錄
    pub movement_in: StockMovement,
}

/// 調撥計劃器
pub struct TransferPlanner;

impl TransferPlanner {
    /// 驗證並產生調撥計劃
    ///
    /// 來源庫存必須足夠——調撥不受 `allow_negative_stock` 影響，
    /// 無論政策如何都不得使來源為負。
    pub fn plan(
        product: &Product,
        source: &Warehouse,
        dest: &Warehouse,
        quantity: Decimal,
        notes: Option<String>,
        reference_document: Option<String>,
        user: &str,
    ) -> Result<TransferPlan> {
        if source.id == dest.id {
            return Err(StockError::SameWarehouseTransfer(source.id.clone()));
        }

        if quantity <= Decimal::ZERO {
            return Err(StockError::InvalidQuantity(quantity));
        }

        let source_before = product.stock_at(&source.id);
        if source_before < quantity {
            return Err(StockError::InsufficientStockForTransfer {
                requested: quantity,
                available: source_before,
                shortfall: quantity - source_before,
            });
        }

        let dest_before = product.stock_at(&dest.id);
        let source_after = source_before - quantity;
        let dest_after = dest_before + quantity;

        let group_id = Uuid::new_v4();

        let mut movement_out = StockMovement::new(
            product.id.clone(),
            product.code.clone(),
            source.id.clone(),
            MovementKind::TransferOut,
            TRANSFER_REASON.to_string(),
            quantity,
            source_before,
            source_after,
            user.to_string(),
        )
        .with_establishment(
            source.establishment_code.clone(),
            source.establishment_name.clone(),
        )
        .with_transfer_group(group_id, dest.id.clone());

        let mut movement_in = StockMovement::new(
            product.id.clone(),
            product.code.clone(),
            dest.id.clone(),
            MovementKind::TransferIn,
            TRANSFER_REASON.to_string(),
            quantity,
            dest_before,
            dest_after,
            user.to_string(),
        )
        .with_establishment(
            dest.establishment_code.clone(),
            dest.establishment_name.clone(),
        )
        .with_transfer_group(group_id, source.id.clone());

        movement_out.notes = notes.clone();
        movement_out.reference_document = reference_document.clone();
        movement_in.notes = notes;
        movement_in.reference_document = reference_document;

        // 互相連結，對帳時可由任一分錄直接查到對向
        movement_out.linked_movement_id = Some(movement_in.id);
        movement_in.linked_movement_id = Some(movement_out.id);

        Ok(TransferPlan {
            source_warehouse_id: source.id.clone(),
            dest_warehouse_id: dest.id.clone(),
            source_before,
            source_after,
            dest_before,
            dest_after,
            movement_out,
            movement_in,
        })
    }
}
