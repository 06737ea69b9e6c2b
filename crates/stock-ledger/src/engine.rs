//! 庫存引擎門面

use rust_decimal::Decimal;

use stock_core::{
    threshold::validate_bounds, MovementKind, Product, Result, StockError, StockMovement,
    StockPolicy, StockRegistry, ThresholdPatch,
};

use crate::{
    CancelFlag, MassUpdateReport, MovementLedger, MutationCalculator, MutationOutcome, RowError,
    TransferOutcome, TransferPlanner,
};

/// 單筆異動請求
#[derive(Debug, Clone)]
pub struct MutationRequest {
    /// 異動類型（調撥類不可走此路徑）
    pub kind: MovementKind,

    /// 原因代碼
    pub reason: String,

    /// 異動數量（恆為正）
    pub quantity: Decimal,

    /// 備註
    pub notes: Option<String>,

    /// 參考單據
    pub reference_document: Option<String>,
}

impl MutationRequest {
    /// 創建新的異動請求
    pub fn new(kind: MovementKind, reason: String, quantity: Decimal) -> Self {
        Self {
            kind,
            reason,
            quantity,
            notes: None,
            reference_document: None,
        }
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
}

/// 批次更新的單列目標
#[derive(Debug, Clone)]
pub struct MassUpdateRow {
    /// 產品ID
    pub product_id: String,

    /// 倉庫ID
    pub warehouse_id: String,

    /// 異動數量
    pub quantity: Decimal,

    /// 異動類型
    pub kind: MovementKind,

    /// 原因代碼
    pub reason: String,
}

impl MassUpdateRow {
    /// 創建新的批次列
    pub fn new(
        product_id: String,
        warehouse_id: String,
        quantity: Decimal,
        kind: MovementKind,
        reason: String,
    ) -> Self {
        Self {
            product_id,
            warehouse_id,
            quantity,
            kind,
            reason,
        }
    }
}

/// 庫存引擎
///
/// 寫入操作以 `&mut self` 序列化；同一 (產品, 倉庫) 的
/// 讀-改-寫-追加因此線性化。調撥的兩側依倉庫ID順序套用，
/// 外部鎖表可遵循相同順序避免死鎖。
pub struct StockEngine<R: StockRegistry> {
    /// 產品/倉庫註冊表
    registry: R,

    /// 異動帳冊
    ledger: MovementLedger,

    /// 庫存政策
    policy: StockPolicy,
}

impl<R: StockRegistry> StockEngine<R> {
    /// 創建新的庫存引擎（預設政策）
    pub fn new(registry: R) -> Self {
        Self {
            registry,
            ledger: MovementLedger::new(),
            policy: StockPolicy::new(),
        }
    }

    /// 建構器模式：設置庫存政策
    pub fn with_policy(mut self, policy: StockPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// 獲取註冊表引用
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// 獲取帳冊引用
    pub fn ledger(&self) -> &MovementLedger {
        &self.ledger
    }

    /// 獲取政策引用
    pub fn policy(&self) -> &StockPolicy {
        &self.policy
    }

    /// 套用單筆異動
    ///
    /// 驗證全部通過後才提交：更新產品數量、蓋時間戳、保存、
    /// 追加一筆異動。被拒絕的異動不留下任何可見變更。
    pub fn apply_mutation(
        &mut self,
        product_id: &str,
        warehouse_id: &str,
        request: MutationRequest,
        user: &str,
    ) -> Result<MutationOutcome> {
        let warehouse = self
            .registry
            .warehouse(warehouse_id)
            .ok_or_else(|| StockError::WarehouseNotFound(warehouse_id.to_string()))?
            .clone();

        if !warehouse.is_active() {
            return Err(StockError::InactiveWarehouse(warehouse.id.clone()));
        }

        let mut product = self
            .registry
            .product(product_id)
            .ok_or_else(|| StockError::ProductNotFound(product_id.to_string()))?
            .clone();

        let delta = MutationCalculator::compute(
            product.stock_at(warehouse_id),
            request.kind,
            request.quantity,
            self.policy.allow_negative_stock,
        )?;

        // 提交
        product.set_stock_at(warehouse_id, delta.stock_after);
        product.touch();

        let mut movement = StockMovement::new(
            product.id.clone(),
            product.code.clone(),
            warehouse.id.clone(),
            request.kind,
            request.reason,
            request.quantity,
            delta.stock_before,
            delta.stock_after,
            user.to_string(),
        )
        .with_establishment(
            warehouse.establishment_code.clone(),
            warehouse.establishment_name.clone(),
        );
        movement.notes = request.notes;
        movement.reference_document = request.reference_document;

        self.registry.save_product(product.clone());
        self.ledger.append(movement.clone());

        tracing::info!(
            "庫存異動: 產品 {} 倉庫 {} {} {} (前 {} 後 {})",
            product.id,
            warehouse.id,
            movement.kind.as_str(),
            movement.quantity,
            delta.stock_before,
            delta.stock_after
        );

        Ok(MutationOutcome { product, movement })
    }

    /// 執行倉庫間調撥
    ///
    /// 來源減量與目的加量、兩筆成對分錄是一個原子單位：
    /// 任一驗證失敗時不套用任何變更。
    pub fn transfer(
        &mut self,
        product_id: &str,
        source_warehouse_id: &str,
        dest_warehouse_id: &str,
        quantity: Decimal,
        notes: Option<String>,
        reference_document: Option<String>,
        user: &str,
    ) -> Result<TransferOutcome> {
        let source = self
            .registry
            .warehouse(source_warehouse_id)
            .ok_or_else(|| StockError::WarehouseNotFound(source_warehouse_id.to_string()))?
            .clone();
        let dest = self
            .registry
            .warehouse(dest_warehouse_id)
            .ok_or_else(|| StockError::WarehouseNotFound(dest_warehouse_id.to_string()))?
            .clone();

        if !source.is_active() {
            return Err(StockError::InactiveWarehouse(source.id.clone()));
        }
        if !dest.is_active() {
            return Err(StockError::InactiveWarehouse(dest.id.clone()));
        }

        let mut product = self
            .registry
            .product(product_id)
            .ok_or_else(|| StockError::ProductNotFound(product_id.to_string()))?
            .clone();

        let plan = TransferPlanner::plan(
            &product,
            &source,
            &dest,
            quantity,
            notes,
            reference_document,
            user,
        )?;

        // 提交：兩側依倉庫ID順序套用（鎖定順序約定）
        let mut sides = [
            (&plan.source_warehouse_id, plan.source_after),
            (&plan.dest_warehouse_id, plan.dest_after),
        ];
        sides.sort_by(|a, b| a.0.cmp(b.0));
        for (warehouse_id, stock_after) in sides {
            product.set_stock_at(warehouse_id, stock_after);
        }
        product.touch();

        self.registry.save_product(product.clone());
        self.ledger.append(plan.movement_out.clone());
        self.ledger.append(plan.movement_in.clone());

        tracing::info!(
            "庫存調撥: 產品 {} {} → {} 數量 {} (群組 {})",
            product.id,
            source.id,
            dest.id,
            quantity,
            plan.movement_out
                .transfer_group_id
                .map(|g| g.to_string())
                .unwrap_or_default()
        );

        Ok(TransferOutcome {
            product,
            movements: [plan.movement_out, plan.movement_in],
        })
    }

    /// 批次更新
    ///
    /// 逐列委派給 [`Self::apply_mutation`]；失敗列記入報告後繼續，
    /// 不回滾先前已成功的列。同一 (產品, 倉庫) 的重複列依序套用，
    /// 後列看得到前列的結果。
    pub fn mass_update(&mut self, rows: Vec<MassUpdateRow>, user: &str) -> MassUpdateReport {
        self.mass_update_with_cancel(rows, user, &CancelFlag::new())
    }

    /// 批次更新（可取消版本）
    ///
    /// 取消只在列與列之間檢查，不會中斷進行中的單列。
    pub fn mass_update_with_cancel(
        &mut self,
        rows: Vec<MassUpdateRow>,
        user: &str,
        cancel: &CancelFlag,
    ) -> MassUpdateReport {
        let total = rows.len();
        tracing::debug!("開始批次更新：共 {} 列", total);

        let mut report = MassUpdateReport::empty();

        for (index, row) in rows.into_iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::warn!("批次更新於第 {} 列前取消", index);
                report.cancelled = true;
                break;
            }

            let request = MutationRequest::new(row.kind, row.reason, row.quantity);
            match self.apply_mutation(&row.product_id, &row.warehouse_id, request, user) {
                Ok(outcome) => report.movements.push(outcome.movement),
                Err(error) => {
                    tracing::debug!(
                        "批次更新第 {} 列失敗: 產品 {} 倉庫 {}: {}",
                        index,
                        row.product_id,
                        row.warehouse_id,
                        error
                    );
                    report.row_errors.push(RowError {
                        index,
                        product_id: row.product_id,
                        warehouse_id: row.warehouse_id,
                        error,
                    });
                }
            }
        }

        tracing::info!(
            "批次更新完成: 成功 {} 列, 失敗 {} 列 (共 {} 列)",
            report.applied(),
            report.skipped(),
            total
        );

        report
    }

    /// 設定某 (產品, 倉庫) 的庫存上下限
    ///
    /// 兩個界限各自獨立：`Set` 設置、`Clear` 清除、`Keep` 不動。
    /// 套用後的組合驗證失敗時不保存任何變更。
    /// 上下限屬於配置而非庫存異動，倉庫未啟用時亦可設定。
    pub fn set_threshold(
        &mut self,
        product_id: &str,
        warehouse_id: &str,
        patch: ThresholdPatch,
    ) -> Result<Product> {
        if self.registry.warehouse(warehouse_id).is_none() {
            return Err(StockError::WarehouseNotFound(warehouse_id.to_string()));
        }

        let mut product = self
            .registry
            .product(product_id)
            .ok_or_else(|| StockError::ProductNotFound(product_id.to_string()))?
            .clone();

        let minimum = patch.minimum.apply(product.min_at(warehouse_id));
        let maximum = patch.maximum.apply(product.max_at(warehouse_id));

        validate_bounds(minimum, maximum)?;

        match minimum {
            Some(value) => product.min_stock.insert(warehouse_id.to_string(), value),
            None => product.min_stock.remove(warehouse_id),
        };
        match maximum {
            Some(value) => product.max_stock.insert(warehouse_id.to_string(), value),
            None => product.max_stock.remove(warehouse_id),
        };
        product.touch();

        self.registry.save_product(product.clone());

        tracing::debug!(
            "上下限設定: 產品 {} 倉庫 {} 最低 {:?} 最高 {:?}",
            product.id,
            warehouse_id,
            minimum,
            maximum
        );

        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stock_core::{InMemoryRegistry, Product, Warehouse};

    fn engine_fixture() -> StockEngine<InMemoryRegistry> {
        let mut registry = InMemoryRegistry::new();
        registry.insert_warehouse(
            Warehouse::new(
                "WH-A".to_string(),
                "ALM-01".to_string(),
                "Almacén Central".to_string(),
                "EST-01".to_string(),
            )
            .with_establishment_names("SUC-01".to_string(), "Sucursal Lima".to_string()),
        );
        registry.insert_warehouse(Warehouse::new(
            "WH-B".to_string(),
            "ALM-02".to_string(),
            "Almacén Norte".to_string(),
            "EST-01".to_string(),
        ));
        registry.insert_warehouse(
            Warehouse::new(
                "WH-X".to_string(),
                "ALM-99".to_string(),
                "Depósito cerrado".to_string(),
                "EST-02".to_string(),
            )
            .with_active(false),
        );
        registry.insert_product(
            Product::new(
                "P-001".to_string(),
                "SKU-001".to_string(),
                "Teclado".to_string(),
            )
            .with_stock("WH-A", Decimal::from(10)),
        );

        StockEngine::new(registry)
    }

    #[test]
    fn test_apply_mutation_updates_registry_and_ledger() {
        let mut engine = engine_fixture();

        let outcome = engine
            .apply_mutation(
                "P-001",
                "WH-A",
                MutationRequest::new(MovementKind::Exit, "VENTA".to_string(), Decimal::from(3)),
                "jperez",
            )
            .unwrap();

        assert_eq!(outcome.product.stock_at("WH-A"), Decimal::from(7));
        assert_eq!(outcome.movement.stock_before, Decimal::from(10));
        assert_eq!(outcome.movement.stock_after, Decimal::from(7));
        assert_eq!(outcome.movement.establishment_code, "SUC-01");
        assert!(outcome.product.updated_at.is_some());

        // 註冊表與帳冊同步更新
        assert_eq!(
            engine.registry().product("P-001").unwrap().stock_at("WH-A"),
            Decimal::from(7)
        );
        assert_eq!(engine.ledger().len(), 1);
        let last = engine.ledger().last_for("P-001", "WH-A").unwrap();
        assert_eq!(last.stock_after, Decimal::from(7));
    }

    #[test]
    fn test_rejected_mutation_leaves_no_trace() {
        let mut engine = engine_fixture();

        let result = engine.apply_mutation(
            "P-001",
            "WH-A",
            MutationRequest::new(MovementKind::Exit, "VENTA".to_string(), Decimal::from(99)),
            "jperez",
        );

        assert!(matches!(result, Err(StockError::InsufficientStock { .. })));
        assert_eq!(
            engine.registry().product("P-001").unwrap().stock_at("WH-A"),
            Decimal::from(10)
        );
        assert!(engine.ledger().is_empty());
    }

    #[test]
    fn test_mutation_on_inactive_warehouse_rejected() {
        let mut engine = engine_fixture();

        let result = engine.apply_mutation(
            "P-001",
            "WH-X",
            MutationRequest::new(MovementKind::Entry, "COMPRA".to_string(), Decimal::from(5)),
            "jperez",
        );

        assert!(matches!(result, Err(StockError::InactiveWarehouse(_))));
        assert!(engine.ledger().is_empty());
    }

    #[test]
    fn test_unknown_ids_rejected() {
        let mut engine = engine_fixture();

        assert!(matches!(
            engine.apply_mutation(
                "P-404",
                "WH-A",
                MutationRequest::new(MovementKind::Entry, "COMPRA".to_string(), Decimal::ONE),
                "jperez",
            ),
            Err(StockError::ProductNotFound(_))
        ));
        assert!(matches!(
            engine.apply_mutation(
                "P-001",
                "WH-404",
                MutationRequest::new(MovementKind::Entry, "COMPRA".to_string(), Decimal::ONE),
                "jperez",
            ),
            Err(StockError::WarehouseNotFound(_))
        ));
    }

    #[test]
    fn test_negative_stock_allowed_by_policy() {
        let mut engine =
            engine_fixture().with_policy(StockPolicy::new().with_allow_negative_stock(true));

        let outcome = engine
            .apply_mutation(
                "P-001",
                "WH-A",
                MutationRequest::new(
                    MovementKind::AdjustNegative,
                    "MERMA".to_string(),
                    Decimal::from(15),
                ),
                "jperez",
            )
            .unwrap();

        assert_eq!(outcome.product.stock_at("WH-A"), Decimal::from(-5));
    }

    #[test]
    fn test_transfer_moves_and_links() {
        let mut engine = engine_fixture();

        let outcome = engine
            .transfer("P-001", "WH-A", "WH-B", Decimal::from(4), None, None, "jperez")
            .unwrap();

        assert_eq!(outcome.product.stock_at("WH-A"), Decimal::from(6));
        assert_eq!(outcome.product.stock_at("WH-B"), Decimal::from(4));

        // 數量守恆
        assert_eq!(
            outcome.product.stock_at("WH-A") + outcome.product.stock_at("WH-B"),
            Decimal::from(10)
        );

        let [out, inm] = &outcome.movements;
        assert_eq!(out.linked_movement_id, Some(inm.id));
        assert_eq!(inm.linked_movement_id, Some(out.id));
        assert_eq!(out.transfer_group_id, inm.transfer_group_id);
        assert_eq!(engine.ledger().len(), 2);

        // 對向分錄可由帳冊直接查到
        let counterpart = engine.ledger().linked(out).unwrap();
        assert_eq!(counterpart.id, inm.id);
    }

    #[test]
    fn test_transfer_never_negative_even_when_policy_allows() {
        let mut engine =
            engine_fixture().with_policy(StockPolicy::new().with_allow_negative_stock(true));

        let result = engine.transfer(
            "P-001",
            "WH-A",
            "WH-B",
            Decimal::from(11),
            None,
            None,
            "jperez",
        );

        assert!(matches!(
            result,
            Err(StockError::InsufficientStockForTransfer { shortfall, .. })
                if shortfall == Decimal::ONE
        ));
        // 任何一側都沒有變更
        assert_eq!(
            engine.registry().product("P-001").unwrap().stock_at("WH-A"),
            Decimal::from(10)
        );
        assert!(engine.ledger().is_empty());
    }

    #[test]
    fn test_transfer_to_inactive_warehouse_rejected() {
        let mut engine = engine_fixture();

        let result = engine.transfer(
            "P-001",
            "WH-A",
            "WH-X",
            Decimal::from(2),
            None,
            None,
            "jperez",
        );

        assert!(matches!(result, Err(StockError::InactiveWarehouse(_))));
        assert!(engine.ledger().is_empty());
    }

    #[test]
    fn test_mass_update_partial_success() {
        let mut engine = engine_fixture();

        let rows = vec![
            MassUpdateRow::new(
                "P-001".to_string(),
                "WH-A".to_string(),
                Decimal::from(5),
                MovementKind::Entry,
                "IMPORT".to_string(),
            ),
            MassUpdateRow::new(
                "P-404".to_string(), // 不存在的產品
                "WH-A".to_string(),
                Decimal::from(5),
                MovementKind::Entry,
                "IMPORT".to_string(),
            ),
            MassUpdateRow::new(
                "P-001".to_string(),
                "WH-404".to_string(), // 不存在的倉庫
                Decimal::from(5),
                MovementKind::Entry,
                "IMPORT".to_string(),
            ),
            MassUpdateRow::new(
                "P-001".to_string(),
                "WH-A".to_string(),
                Decimal::from(2),
                MovementKind::Exit,
                "IMPORT".to_string(),
            ),
        ];

        let report = engine.mass_update(rows, "importer");

        assert_eq!(report.applied(), 2);
        assert_eq!(report.skipped(), 2);
        assert!(report.is_partial());
        assert!(!report.cancelled);
        assert_eq!(report.row_errors[0].index, 1);
        assert_eq!(report.row_errors[1].index, 2);

        // 重複列依序套用：10 + 5 - 2 = 13
        assert_eq!(
            engine.registry().product("P-001").unwrap().stock_at("WH-A"),
            Decimal::from(13)
        );
        // 第二列看見第一列的結果
        assert_eq!(report.movements[1].stock_before, Decimal::from(15));
    }

    #[test]
    fn test_mass_update_cancelled_between_rows() {
        let mut engine = engine_fixture();
        let cancel = CancelFlag::new();
        cancel.cancel();

        let rows = vec![MassUpdateRow::new(
            "P-001".to_string(),
            "WH-A".to_string(),
            Decimal::from(5),
            MovementKind::Entry,
            "IMPORT".to_string(),
        )];

        let report = engine.mass_update_with_cancel(rows, "importer", &cancel);

        assert!(report.cancelled);
        assert_eq!(report.applied(), 0);
        assert!(engine.ledger().is_empty());
    }

    #[test]
    fn test_set_threshold_bounds_are_independent() {
        let mut engine = engine_fixture();

        let product = engine
            .set_threshold(
                "P-001",
                "WH-A",
                ThresholdPatch::new().set_minimum(Decimal::from(5)),
            )
            .unwrap();
        assert_eq!(product.min_at("WH-A"), Some(Decimal::from(5)));
        assert_eq!(product.max_at("WH-A"), None);

        // 設置最高不影響既有最低
        let product = engine
            .set_threshold(
                "P-001",
                "WH-A",
                ThresholdPatch::new().set_maximum(Decimal::from(20)),
            )
            .unwrap();
        assert_eq!(product.min_at("WH-A"), Some(Decimal::from(5)));
        assert_eq!(product.max_at("WH-A"), Some(Decimal::from(20)));

        // 清除最低不影響既有最高
        let product = engine
            .set_threshold("P-001", "WH-A", ThresholdPatch::new().clear_minimum())
            .unwrap();
        assert_eq!(product.min_at("WH-A"), None);
        assert_eq!(product.max_at("WH-A"), Some(Decimal::from(20)));
    }

    #[test]
    fn test_set_threshold_invalid_range_applies_nothing() {
        let mut engine = engine_fixture();

        engine
            .set_threshold(
                "P-001",
                "WH-A",
                ThresholdPatch::new()
                    .set_minimum(Decimal::from(5))
                    .set_maximum(Decimal::from(20)),
            )
            .unwrap();

        // 使最高低於既有最低 → 拒絕且不變
        let result = engine.set_threshold(
            "P-001",
            "WH-A",
            ThresholdPatch::new().set_maximum(Decimal::from(3)),
        );
        assert!(matches!(
            result,
            Err(StockError::InvalidThresholdRange { .. })
        ));

        let product = engine.registry().product("P-001").unwrap();
        assert_eq!(product.min_at("WH-A"), Some(Decimal::from(5)));
        assert_eq!(product.max_at("WH-A"), Some(Decimal::from(20)));
    }

    #[test]
    fn test_set_threshold_is_idempotent() {
        let mut engine = engine_fixture();
        let patch = ThresholdPatch::new()
            .set_minimum(Decimal::from(5))
            .set_maximum(Decimal::from(20));

        engine.set_threshold("P-001", "WH-A", patch).unwrap();
        let product = engine.set_threshold("P-001", "WH-A", patch).unwrap();

        assert_eq!(product.min_at("WH-A"), Some(Decimal::from(5)));
        assert_eq!(product.max_at("WH-A"), Some(Decimal::from(20)));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // 嚴格政策下的任意異動序列：庫存恆 ≥ 0，
            // 帳冊筆數等於成功次數，末筆快照等於註冊表現值
            #[test]
            fn ledger_complete_and_stock_non_negative(
                ops in proptest::collection::vec((0usize..6, 1i64..50), 1..40)
            ) {
                let kinds = [
                    MovementKind::Entry,
                    MovementKind::Exit,
                    MovementKind::AdjustPositive,
                    MovementKind::AdjustNegative,
                    MovementKind::Return,
                    MovementKind::Shrinkage,
                ];

                let mut engine = engine_fixture();
                let mut successes = 0usize;

                for (kind_idx, quantity) in ops {
                    let request = MutationRequest::new(
                        kinds[kind_idx],
                        "PROP".to_string(),
                        Decimal::from(quantity),
                    );
                    if engine
                        .apply_mutation("P-001", "WH-A", request, "prop")
                        .is_ok()
                    {
                        successes += 1;
                    }

                    let current = engine.registry().product("P-001").unwrap().stock_at("WH-A");
                    prop_assert!(current >= Decimal::ZERO);
                }

                prop_assert_eq!(engine.ledger().len(), successes);
                if let Some(last) = engine.ledger().last_for("P-001", "WH-A") {
                    let current =
                        engine.registry().product("P-001").unwrap().stock_at("WH-A");
                    prop_assert_eq!(last.stock_after, current);
                }
                prop_assert!(engine.ledger().inconsistent().is_empty());
            }

            // 任意調撥序列的數量守恆
            #[test]
            fn transfers_conserve_total(
                quantities in proptest::collection::vec(1i64..20, 1..20)
            ) {
                let mut engine = engine_fixture();
                let initial = engine.registry().product("P-001").unwrap().total_stock();

                for (i, quantity) in quantities.into_iter().enumerate() {
                    let (source, dest) = if i % 2 == 0 {
                        ("WH-A", "WH-B")
                    } else {
                        ("WH-B", "WH-A")
                    };
                    let _ = engine.transfer(
                        "P-001",
                        source,
                        dest,
                        Decimal::from(quantity),
                        None,
                        None,
                        "prop",
                    );
                }

                let product = engine.registry().product("P-001").unwrap();
                prop_assert_eq!(product.total_stock(), initial);
                prop_assert!(product.stock_at("WH-A") >= Decimal::ZERO);
                prop_assert!(product.stock_at("WH-B") >= Decimal::ZERO);
                // 調撥成對出現
                prop_assert_eq!(engine.ledger().len() % 2, 0);
            }
        }
    }
}
