//! 產品模型

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 產品
///
/// 數量一律按倉庫記錄；沒有「總庫存」欄位，總量永遠由範圍加總導出。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// 產品ID
    pub id: String,

    /// 產品編號
    pub code: String,

    /// 產品名稱
    pub name: String,

    /// 單價
    pub unit_price: Decimal,

    /// 各倉庫實際庫存（倉庫ID → 數量）
    pub stock: HashMap<String, Decimal>,

    /// 各倉庫保留數量（倉庫ID → 數量）
    pub reserved: HashMap<String, Decimal>,

    /// 各倉庫最低庫存（未設定 ≠ 設定為零）
    pub min_stock: HashMap<String, Decimal>,

    /// 各倉庫最高庫存（未設定 ≠ 設定為零）
    pub max_stock: HashMap<String, Decimal>,

    /// 最後更新時間
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// 創建新的產品
    pub fn new(id: String, code: String, name: String) -> Self {
        Self {
            id,
            code,
            name,
            unit_price: Decimal::ZERO,
            stock: HashMap::new(),
            reserved: HashMap::new(),
            min_stock: HashMap::new(),
            max_stock: HashMap::new(),
            updated_at: None,
        }
    }

    /// 建構器模式：設置單價
    pub fn with_unit_price(mut self, unit_price: Decimal) -> Self {
        self.unit_price = unit_price;
        self
    }

    /// 建構器模式：設置某倉庫的實際庫存
    pub fn with_stock(mut self, warehouse_id: &str, quantity: Decimal) -> Self {
        self.stock.insert(warehouse_id.to_string(), quantity);
        self
    }

    /// 建構器模式：設置某倉庫的保留數量
    pub fn with_reserved(mut self, warehouse_id: &str, quantity: Decimal) -> Self {
        self.reserved.insert(warehouse_id.to_string(), quantity);
        self
    }

    /// 建構器模式：設置某倉庫的最低庫存
    pub fn with_min_stock(mut self, warehouse_id: &str, quantity: Decimal) -> Self {
        self.min_stock.insert(warehouse_id.to_string(), quantity);
        self
    }

    /// 建構器模式：設置某倉庫的最高庫存
    pub fn with_max_stock(mut self, warehouse_id: &str, quantity: Decimal) -> Self {
        self.max_stock.insert(warehouse_id.to_string(), quantity);
        self
    }

    /// 某倉庫的實際庫存（未記錄視為零）
    pub fn stock_at(&self, warehouse_id: &str) -> Decimal {
        self.stock.get(warehouse_id).copied().unwrap_or(Decimal::ZERO)
    }

    /// 某倉庫的保留數量（未記錄視為零）
    pub fn reserved_at(&self, warehouse_id: &str) -> Decimal {
        self.reserved
            .get(warehouse_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// 某倉庫的最低庫存（None 表示未設定）
    pub fn min_at(&self, warehouse_id: &str) -> Option<Decimal> {
        self.min_stock.get(warehouse_id).copied()
    }

    /// 某倉庫的最高庫存（None 表示未設定）
    pub fn max_at(&self, warehouse_id: &str) -> Option<Decimal> {
        self.max_stock.get(warehouse_id).copied()
    }

    /// 寫入某倉庫的實際庫存
    pub fn set_stock_at(&mut self, warehouse_id: &str, quantity: Decimal) {
        self.stock.insert(warehouse_id.to_string(), quantity);
    }

    /// 寫入某倉庫的保留數量
    pub fn set_reserved_at(&mut self, warehouse_id: &str, quantity: Decimal) {
        self.reserved.insert(warehouse_id.to_string(), quantity);
    }

    /// 所有倉庫實際庫存加總
    pub fn total_stock(&self) -> Decimal {
        self.stock.values().copied().sum()
    }

    /// 蓋上更新時間戳
    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}
