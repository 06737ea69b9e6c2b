//! 異動匯出
//!
//! 每筆異動一列，欄位原樣輸出，供稽核與報表使用。

use stock_core::StockMovement;

/// 異動匯出器
pub struct MovementExport;

impl MovementExport {
    /// 表頭
    pub fn header() -> Vec<&'static str> {
        vec![
            "id",
            "product_id",
            "product_code",
            "warehouse_id",
            "establishment_code",
            "establishment_name",
            "kind",
            "reason",
            "quantity",
            "stock_before",
            "stock_after",
            "user",
            "notes",
            "reference_document",
            "created_at",
            "transfer_group_id",
            "counterpart_warehouse_id",
            "linked_movement_id",
        ]
    }

    /// 單筆異動轉為表格列
    pub fn row(movement: &StockMovement) -> Vec<String> {
        vec![
            movement.id.to_string(),
            movement.product_id.clone(),
            movement.product_code.clone(),
            movement.warehouse_id.clone(),
            movement.establishment_code.clone(),
            movement.establishment_name.clone(),
            movement.kind.as_str().to_string(),
            movement.reason.clone(),
            movement.quantity.to_string(),
            movement.stock_before.to_string(),
            movement.stock_after.to_string(),
            movement.user.clone(),
            movement.notes.clone().unwrap_or_default(),
            movement.reference_document.clone().unwrap_or_default(),
            movement.created_at.to_rfc3339(),
            movement
                .transfer_group_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            movement
                .counterpart_warehouse_id
                .clone()
                .unwrap_or_default(),
            movement
                .linked_movement_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
        ]
    }

    /// 匯出為 CSV 字串（含表頭）
    pub fn csv(movements: &[StockMovement]) -> String {
        let mut out = String::new();
        out.push_str(&Self::header().join(","));
        out.push('\n');

        for movement in movements {
            let fields: Vec<String> = Self::row(movement)
                .into_iter()
                .map(|f| Self::escape(&f))
                .collect();
            out.push_str(&fields.join(","));
            out.push('\n');
        }

        out
    }

    /// 匯出為 JSON Lines（每列一個 JSON 物件）
    pub fn json_lines(movements: &[StockMovement]) -> serde_json::Result<String> {
        let mut out = String::new();
        for movement in movements {
            out.push_str(&serde_json::to_string(movement)?);
            out.push('\n');
        }
        Ok(out)
    }

    fn escape(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }
}
