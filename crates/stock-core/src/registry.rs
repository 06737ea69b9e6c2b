//! 產品/倉庫註冊表

use std::collections::HashMap;

use crate::{Product, Warehouse};

/// 產品/倉庫註冊表介面
///
/// 異動與彙總邏輯只透過此介面讀取與保存產品狀態，
/// 不依賴實際的保存方式。`save_product` 為冪等的整體覆寫。
pub trait StockRegistry {
    /// 依ID取得產品
    fn product(&self, id: &str) -> Option<&Product>;

    /// 依ID取得倉庫
    fn warehouse(&self, id: &str) -> Option<&Warehouse>;

    /// 保存更新後的產品狀態（依 `product.id` 覆寫）
    fn save_product(&mut self, product: Product);

    /// 所有產品
    fn products(&self) -> Vec<&Product>;

    /// 所有倉庫
    fn warehouses(&self) -> Vec<&Warehouse>;
}

/// 記憶體內註冊表（以ID為鍵的 arena 保存）
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    products: HashMap<String, Product>,
    warehouses: HashMap<String, Warehouse>,
}

impl InMemoryRegistry {
    /// 創建空的註冊表
    pub fn new() -> Self {
        Self {
            products: HashMap::new(),
            warehouses: HashMap::new(),
        }
    }

    /// 加入產品
    pub fn insert_product(&mut self, product: Product) {
        self.products.insert(product.id.clone(), product);
    }

    /// 加入倉庫
    pub fn insert_warehouse(&mut self, warehouse: Warehouse) {
        self.warehouses.insert(warehouse.id.clone(), warehouse);
    }

    /// 產品數量
    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    /// 倉庫數量
    pub fn warehouse_count(&self) -> usize {
        self.warehouses.len()
    }
}

impl StockRegistry for InMemoryRegistry {
    fn product(&self, id: &str) -> Option<&Product> {
        self.products.get(id)
    }

    fn warehouse(&self, id: &str) -> Option<&Warehouse> {
        self.warehouses.get(id)
    }

    fn save_product(&mut self, product: Product) {
        self.products.insert(product.id.clone(), product);
    }

    fn products(&self) -> Vec<&Product> {
        self.products.values().collect()
    }

    fn warehouses(&self) -> Vec<&Warehouse> {
        self.warehouses.values().collect()
    }
}
