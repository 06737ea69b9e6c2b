//! 庫存異動模型

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 異動類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    /// 入庫
    Entry,
    /// 出庫
    Exit,
    /// 正向調整
    AdjustPositive,
    /// 負向調整
    AdjustNegative,
    /// 退貨
    Return,
    /// 損耗
    Shrinkage,
    /// 調撥入庫
    TransferIn,
    /// 調撥出庫
    TransferOut,
}

impl MovementKind {
    /// 是否為加量異動
    pub fn is_inbound(&self) -> bool {
        matches!(
            self,
            MovementKind::Entry
                | MovementKind::AdjustPositive
                | MovementKind::Return
                | MovementKind::TransferIn
        )
    }

    /// 是否為調撥類異動
    pub fn is_transfer(&self) -> bool {
        matches!(self, MovementKind::TransferIn | MovementKind::TransferOut)
    }

    /// 依類型符號化數量（加量為正，減量為負）
    pub fn signed(&self, quantity: Decimal) -> Decimal {
        if self.is_inbound() {
            quantity
        } else {
            -quantity
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Entry => "ENTRY",
            MovementKind::Exit => "EXIT",
            MovementKind::AdjustPositive => "ADJUST_POSITIVE",
            MovementKind::AdjustNegative => "ADJUST_NEGATIVE",
            MovementKind::Return => "RETURN",
            MovementKind::Shrinkage => "SHRINKAGE",
            MovementKind::TransferIn => "TRANSFER_IN",
            MovementKind::TransferOut => "TRANSFER_OUT",
        }
    }
}

/// 庫存異動紀錄
///
/// 不可變、僅追加；帳冊不提供任何修改或刪除。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMovement {
    /// 異動ID
    pub id: Uuid,

    /// 產品ID
    pub product_id: String,

    /// 產品編號（反正規化）
    pub product_code: String,

    /// 倉庫ID
    pub warehouse_id: String,

    /// 據點編號（反正規化，取自倉庫）
    pub establishment_code: String,

    /// 據點名稱（反正規化，取自倉庫）
    pub establishment_name: String,

    /// 異動類型
    pub kind: MovementKind,

    /// 原因代碼
    pub reason: String,

    /// 異動數量（恆為正；方向由類型決定）
    pub quantity: Decimal,

    /// 異動前數量快照
    pub stock_before: Decimal,

    /// 異動後數量快照
    pub stock_after: Decimal,

    /// 操作人（稽核用識別字串）
    pub user: String,

    /// 備註
    pub notes: Option<String>,

    /// 參考單據
    pub reference_document: Option<String>,

    /// 異動時間
    pub created_at: DateTime<Utc>,

    /// 調撥群組ID（僅調撥分錄）
    pub transfer_group_id: Option<Uuid>,

    /// 對向倉庫ID（僅調撥分錄）
    pub counterpart_warehouse_id: Option<String>,

    /// 成對異動ID（僅調撥分錄）
    pub linked_movement_id: Option<Uuid>,
}

impl StockMovement {
    /// 創建新的異動紀錄
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        product_id: String,
        product_code: String,
        warehouse_id: String,
        kind: MovementKind,
        reason: String,
        quantity: Decimal,
        stock_before: Decimal,
        stock_after: Decimal,
        user: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id,
            product_code,
            warehouse_id,
            establishment_code: String::new(),
            establishment_name: String::new(),
            kind,
            reason,
            quantity,
            stock_before,
            stock_after,
            user,
            notes: None,
            reference_document: None,
            created_at: Utc::now(),
            transfer_group_id: None,
            counterpart_warehouse_id: None,
            linked_movement_id: None,
        }
    }

    /// 建構器模式：設置據點編號與名稱
    pub fn with_establishment(mut self, code: String, name: String) -> Self {
        self.establishment_code = code;
        self.establishment_name = name;
        self
    }

    /// 建構器模式：設置備註
    pub fn with_notes(mut self, notes: String) -> Self {
        self.notes = Some(notes);
        self
    }

    /// 建構器模式：設置參考單據
    pub fn with_reference_document(mut self, reference_document: String) -> Self {
        self.reference_document = Some(reference_document);
        self
    }

    /// 建構器模式：設置調撥群組與對向倉庫
    pub fn with_transfer_group(mut self, group_id: Uuid, counterpart_warehouse_id: String) -> Self {
        self.transfer_group_id = Some(group_id);
        self.counterpart_warehouse_id = Some(counterpart_warehouse_id);
        self
    }

    /// 檢查前後快照是否滿足 `after = before ± quantity`
    pub fn is_consistent(&self) -> bool {
        self.stock_after == self.stock_before + self.kind.signed(self.quantity)
    }
}
