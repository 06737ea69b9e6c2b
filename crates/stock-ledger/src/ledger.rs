//! 異動帳冊

use std::collections::HashMap;
use uuid::Uuid;

use stock_core::StockMovement;

/// 異動帳冊（僅追加）
///
/// 「發生過什麼」的唯一真相來源；沒有修改或刪除 API。
#[derive(Debug, Clone, Default)]
pub struct MovementLedger {
    movements: Vec<StockMovement>,
    index: HashMap<Uuid, usize>,
}

impl MovementLedger {
    /// 創建空的帳冊
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一筆異動
    pub fn append(&mut self, movement: StockMovement) {
        self.index.insert(movement.id, self.movements.len());
        self.movements.push(movement);
    }

    /// 依ID取得異動
    pub fn get(&self, id: &Uuid) -> Option<&StockMovement> {
        self.index.get(id).map(|&i| &self.movements[i])
    }

    /// 取得成對異動（調撥的對向分錄）
    pub fn linked(&self, movement: &StockMovement) -> Option<&StockMovement> {
        movement.linked_movement_id.as_ref().and_then(|id| self.get(id))
    }

    /// 取得同一調撥群組的所有分錄
    pub fn transfer_pair(&self, group_id: &Uuid) -> Vec<&StockMovement> {
        self.movements
            .iter()
            .filter(|m| m.transfer_group_id.as_ref() == Some(group_id))
            .collect()
    }

    /// 某產品的所有異動（追加順序）
    pub fn for_product(&self, product_id: &str) -> Vec<&StockMovement> {
        self.movements
            .iter()
            .filter(|m| m.product_id == product_id)
            .collect()
    }

    /// 某倉庫的所有異動（追加順序）
    pub fn for_warehouse(&self, warehouse_id: &str) -> Vec<&StockMovement> {
        self.movements
            .iter()
            .filter(|m| m.warehouse_id == warehouse_id)
            .collect()
    }

    /// 某 (產品, 倉庫) 的最後一筆異動
    ///
    /// 重播驗證用：最後一筆的 `stock_after` 應等於註冊表的目前數量。
    pub fn last_for(&self, product_id: &str, warehouse_id: &str) -> Option<&StockMovement> {
        self.movements
            .iter()
            .rev()
            .find(|m| m.product_id == product_id && m.warehouse_id == warehouse_id)
    }

    /// 前後快照不一致的異動
    pub fn inconsistent(&self) -> Vec<&StockMovement> {
        self.movements.iter().filter(|m| !m.is_consistent()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StockMovement> {
        self.movements.iter()
    }

    pub fn as_slice(&self) -> &[StockMovement] {
        &self.movements
    }

    pub fn len(&self) -> usize {
        self.movements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }
}
