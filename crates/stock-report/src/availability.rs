//! 可用庫存彙總

use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use stock_core::{Product, StockPolicy, StockRegistry, Warehouse};

use crate::alert::Situation;

/// 彙總範圍
///
/// 彙總前先解析為具體的啟用倉庫ID集合；
/// 空集合產生空結果，而不是錯誤。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarehouseScope {
    /// 單一倉庫
    Warehouse(String),
    /// 某據點的所有啟用倉庫
    Establishment(String),
    /// 全部啟用倉庫
    Global,
}

impl WarehouseScope {
    /// 解析為啟用倉庫ID集合（排序後，保證彙總順序確定）
    pub fn resolve(&self, warehouses: &[&Warehouse]) -> Vec<String> {
        let mut ids: Vec<String> = warehouses
            .iter()
            .filter(|w| w.is_active())
            .filter(|w| match self {
                WarehouseScope::Warehouse(id) => w.id == *id,
                WarehouseScope::Establishment(establishment_id) => {
                    w.establishment_id == *establishment_id
                }
                WarehouseScope::Global => true,
            })
            .map(|w| w.id.clone())
            .collect();
        ids.sort();
        ids
    }
}

/// 可用庫存列（導出資料，不落地保存）
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityRow {
    /// 產品ID
    pub product_id: String,

    /// 產品編號
    pub code: String,

    /// 產品名稱
    pub name: String,

    /// 範圍內實際庫存加總
    pub real: Decimal,

    /// 範圍內保留數量加總（截斷至不超過實際庫存）
    pub reserved: Decimal,

    /// 可用庫存 = max(0, real − reserved)
    pub available: Decimal,

    /// 解析後的最低庫存
    pub minimum: Option<Decimal>,

    /// 解析後的最高庫存
    pub maximum: Option<Decimal>,

    /// 狀態標籤
    pub situation: Situation,
}

/// 列過濾條件
#[derive(Debug, Clone, Default)]
pub struct AvailabilityFilter {
    /// 編號/名稱關鍵字（不分大小寫）
    pub text: Option<String>,

    /// 只列出可用庫存 > 0 的列
    pub only_available: bool,
}

impl AvailabilityFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置關鍵字
    pub fn with_text(mut self, text: String) -> Self {
        self.text = Some(text);
        self
    }

    /// 建構器模式：只列出有可用庫存的列
    pub fn only_available(mut self) -> Self {
        self.only_available = true;
        self
    }
}

/// 排序鍵
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    Code,
    Name,
    Real,
    Reserved,
    Available,
}

/// 排序規格（同鍵值以產品編號遞增決勝，構成全序）
#[derive(Debug, Clone, Copy)]
pub struct SortSpec {
    pub key: SortKey,
    pub ascending: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            key: SortKey::Code,
            ascending: true,
        }
    }
}

impl SortSpec {
    pub fn new(key: SortKey, ascending: bool) -> Self {
        Self { key, ascending }
    }

    fn compare(&self, a: &AvailabilityRow, b: &AvailabilityRow) -> Ordering {
        let ordering = match self.key {
            SortKey::Code => a.code.cmp(&b.code),
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::Real => a.real.cmp(&b.real),
            SortKey::Reserved => a.reserved.cmp(&b.reserved),
            SortKey::Available => a.available.cmp(&b.available),
        };
        let ordering = if self.ascending {
            ordering
        } else {
            ordering.reverse()
        };
        ordering.then_with(|| a.code.cmp(&b.code))
    }
}

/// 分頁請求（以偏移量為基準）
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    /// 起始偏移
    pub offset: usize,

    /// 每頁筆數
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

impl PageRequest {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }
}

/// 可用庫存頁
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityPage {
    /// 本頁的列
    pub rows: Vec<AvailabilityRow>,

    /// 過濾後的總列數（分頁前）
    pub total_rows: usize,

    /// 起始偏移
    pub offset: usize,

    /// 每頁筆數
    pub limit: usize,
}

impl AvailabilityPage {
    fn empty(page: &PageRequest) -> Self {
        Self {
            rows: Vec::new(),
            total_rows: 0,
            offset: page.offset,
            limit: page.limit,
        }
    }
}

/// 可用庫存彙總器
///
/// 唯讀：不修改註冊表，註冊表不變時跨頁結果穩定。
pub struct AvailabilityAggregator;

impl AvailabilityAggregator {
    /// 列出範圍內各產品的可用庫存
    pub fn list<R: StockRegistry>(
        registry: &R,
        policy: &StockPolicy,
        scope: &WarehouseScope,
        filter: &AvailabilityFilter,
        sort: &SortSpec,
        page: &PageRequest,
    ) -> AvailabilityPage {
        let warehouses = registry.warehouses();
        let scope_ids = scope.resolve(&warehouses);
        if scope_ids.is_empty() {
            return AvailabilityPage::empty(page);
        }

        let products = registry.products();
        tracing::debug!(
            "可用庫存彙總: 範圍 {} 個倉庫, {} 個產品",
            scope_ids.len(),
            products.len()
        );

        let mut rows: Vec<AvailabilityRow> = products
            .par_iter()
            .filter(|p| Self::matches_text(p, filter))
            .map(|p| Self::build_row(p, &scope_ids, policy))
            .filter(|row| !filter.only_available || row.available > Decimal::ZERO)
            .collect();

        rows.sort_by(|a, b| sort.compare(a, b));

        let total_rows = rows.len();
        let rows: Vec<AvailabilityRow> = rows
            .into_iter()
            .skip(page.offset)
            .take(page.limit)
            .collect();

        AvailabilityPage {
            rows,
            total_rows,
            offset: page.offset,
            limit: page.limit,
        }
    }

    fn matches_text(product: &Product, filter: &AvailabilityFilter) -> bool {
        match &filter.text {
            None => true,
            Some(text) => {
                let needle = text.to_lowercase();
                product.code.to_lowercase().contains(&needle)
                    || product.name.to_lowercase().contains(&needle)
            }
        }
    }

    fn build_row(product: &Product, scope_ids: &[String], policy: &StockPolicy) -> AvailabilityRow {
        let real: Decimal = scope_ids.iter().map(|w| product.stock_at(w)).sum();
        let reserved_raw: Decimal = scope_ids.iter().map(|w| product.reserved_at(w)).sum();

        // 保留可能暫時超過實際庫存（先保留、後負調整），
        // 截斷後再計算可用量，永不輸出負值
        let reserved = reserved_raw.min(real.max(Decimal::ZERO));
        let available = (real - reserved).max(Decimal::ZERO);

        let minimum = Self::resolve_threshold(scope_ids, |w| product.min_at(w));
        let maximum = Self::resolve_threshold(scope_ids, |w| product.max_at(w));

        let situation = Situation::classify(available, minimum, policy.critical_ratio);

        AvailabilityRow {
            product_id: product.id.clone(),
            code: product.code.clone(),
            name: product.name.clone(),
            real,
            reserved,
            available,
            minimum,
            maximum,
            situation,
        }
    }

    /// 解析範圍內的上下限
    ///
    /// 單倉庫範圍原值透傳（未設定維持未設定）；
    /// 多倉庫範圍只加總有設定的倉庫，全部未設定才回 None。
    /// 「到處都沒設定」不可與「到處都設為零」混同。
    fn resolve_threshold<F>(scope_ids: &[String], value_at: F) -> Option<Decimal>
    where
        F: Fn(&str) -> Option<Decimal>,
    {
        if scope_ids.len() == 1 {
            return value_at(&scope_ids[0]);
        }

        let configured: Vec<Decimal> = scope_ids.iter().filter_map(|w| value_at(w)).collect();
        if configured.is_empty() {
            None
        } else {
            Some(configured.into_iter().sum())
        }
    }
}
