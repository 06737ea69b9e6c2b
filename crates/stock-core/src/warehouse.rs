//! 倉庫模型

use serde::{Deserialize, Serialize};

/// 倉庫
///
/// 每個倉庫隸屬於唯一的據點；據點編號與名稱反正規化保存，
/// 供異動紀錄直接取用。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warehouse {
    /// 倉庫ID
    pub id: String,

    /// 倉庫編號
    pub code: String,

    /// 倉庫名稱
    pub name: String,

    /// 是否啟用（預設啟用；未啟用的倉庫不參與異動與彙總）
    pub active: bool,

    /// 所屬據點ID
    pub establishment_id: String,

    /// 據點編號（反正規化）
    pub establishment_code: String,

    /// 據點名稱（反正規化）
    pub establishment_name: String,
}

impl Warehouse {
    /// 創建新的倉庫
    pub fn new(id: String, code: String, name: String, establishment_id: String) -> Self {
        Self {
            id,
            code,
            name,
            active: true,
            establishment_id,
            establishment_code: String::new(),
            establishment_name: String::new(),
        }
    }

    /// 建構器模式：設置據點編號與名稱
    pub fn with_establishment_names(mut self, code: String, name: String) -> Self {
        self.establishment_code = code;
        self.establishment_name = name;
        self
    }

    /// 建構器模式：設置啟用狀態
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// 檢查是否啟用
    pub fn is_active(&self) -> bool {
        self.active
    }
}
