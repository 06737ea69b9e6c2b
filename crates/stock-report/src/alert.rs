//! 庫存警示判定
//!
//! 全系統唯一的警示分類邏輯：警示面板、通知徽章、匯出報表
//! 與可用庫存列的狀態標籤都必須經由這裡，不得另行實作。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 警示等級
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertLevel {
    /// 正常
    Ok,
    /// 低於最低庫存
    Low,
    /// 超過最高庫存
    Over,
}

/// 警示判定結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertResult {
    /// 警示等級
    pub level: AlertLevel,

    /// 是否危急（可用庫存低於最低庫存 × 危急比例）
    pub is_critical: bool,

    /// 缺口數量（僅 Low）
    pub missing: Option<Decimal>,

    /// 超額數量（僅 Over）
    pub excess: Option<Decimal>,
}

impl AlertResult {
    /// 正常結果
    pub fn ok() -> Self {
        Self {
            level: AlertLevel::Ok,
            is_critical: false,
            missing: None,
            excess: None,
        }
    }
}

/// 警示判定器
pub struct AlertEvaluator;

impl AlertEvaluator {
    /// 判定警示等級
    ///
    /// 規則：
    /// - 設有最高且 `available > maximum` → Over，超額 = available − maximum
    /// - 設有最低（且 > 0）且 `available < minimum` → Low，
    ///   缺口 = minimum − available，危急 = available < minimum × ratio
    /// - 其餘 → Ok
    ///
    /// 最低為零視為未設下限。在合法配置（min ≤ max）下
    /// Over 與 Low 不可能同時成立，Over 先判只是固定順序。
    pub fn evaluate(
        available: Decimal,
        minimum: Option<Decimal>,
        maximum: Option<Decimal>,
        critical_ratio: Decimal,
    ) -> AlertResult {
        if let Some(max) = maximum {
            if available > max {
                return AlertResult {
                    level: AlertLevel::Over,
                    is_critical: false,
                    missing: None,
                    excess: Some(available - max),
                };
            }
        }

        if let Some(min) = minimum {
            if min > Decimal::ZERO && available < min {
                return AlertResult {
                    level: AlertLevel::Low,
                    is_critical: available < min * critical_ratio,
                    missing: Some(min - available),
                    excess: None,
                };
            }
        }

        AlertResult::ok()
    }
}

/// 可用庫存列的狀態標籤（簡化二級分類）
///
/// 與 [`AlertEvaluator`] 共用同一個危急邊界。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Situation {
    /// 正常
    #[serde(rename = "OK")]
    Ok,
    /// 低於最低庫存
    #[serde(rename = "Bajo")]
    Bajo,
    /// 危急
    #[serde(rename = "Crítico")]
    Critico,
    /// 無庫存
    #[serde(rename = "Sin stock")]
    SinStock,
}

impl Situation {
    /// 依可用庫存與最低庫存分類
    pub fn classify(
        available: Decimal,
        minimum: Option<Decimal>,
        critical_ratio: Decimal,
    ) -> Self {
        if available <= Decimal::ZERO {
            return Situation::SinStock;
        }

        let alert = AlertEvaluator::evaluate(available, minimum, None, critical_ratio);
        match alert.level {
            AlertLevel::Low if alert.is_critical => Situation::Critico,
            AlertLevel::Low => Situation::Bajo,
            _ => Situation::Ok,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Situation::Ok => "OK",
            Situation::Bajo => "Bajo",
            Situation::Critico => "Crítico",
            Situation::SinStock => "Sin stock",
        }
    }
}
