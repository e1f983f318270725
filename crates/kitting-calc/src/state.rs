//! 滾動計算的共享狀態

use kitting_core::{InventorySnapshot, KitError, Result, WorkOrderDirectory, WorkOrderKey};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::shortage::Deduction;

/// 計算期間的庫存與已領用狀態
///
/// 由 [`crate::KittingCalculator`] 在單次計算內獨佔持有，每行計算完畢後
/// 把扣減計劃寫回，後續計劃行看到的是累積消耗後的結果。
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationState {
    /// 物料 -> 現有庫存（強制扣減時可為負）
    on_hand: HashMap<String, Decimal>,

    /// 工單 -> 物料 -> 累計已領用量
    issued: HashMap<WorkOrderKey, HashMap<String, Decimal>>,
}

impl AllocationState {
    /// 以庫存快照與工單已領用量初始化
    ///
    /// 同一工單重複出現的物料，已領用量以最後一筆明細為準。
    pub fn new(snapshot: &InventorySnapshot, directory: &WorkOrderDirectory) -> Self {
        let on_hand = snapshot
            .iter()
            .map(|(component_id, qty)| (component_id.clone(), *qty))
            .collect();

        let mut issued: HashMap<WorkOrderKey, HashMap<String, Decimal>> = HashMap::new();
        for order in directory.iter() {
            let ledger = issued.entry(order.key.clone()).or_default();
            for line in &order.bom_lines {
                ledger.insert(line.component_id.clone(), line.issued_qty);
            }
        }

        Self { on_hand, issued }
    }

    /// 目前庫存（缺省為 0，可能為負）
    pub fn on_hand(&self, component_id: &str) -> Decimal {
        self.on_hand
            .get(component_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// 工單某物料的累計已領用量
    pub fn issued(&self, key: &WorkOrderKey, component_id: &str) -> Decimal {
        self.issued
            .get(key)
            .and_then(|ledger| ledger.get(component_id))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// 寫回一行的扣減計劃：庫存減少，工單已領用量增加
    ///
    /// 先算出全部新值再寫入；任一筆溢位時回傳錯誤，狀態保持不變。
    pub fn commit(&mut self, key: &WorkOrderKey, deductions: &[Deduction]) -> Result<()> {
        if deductions.is_empty() {
            return Ok(());
        }

        let mut updates = Vec::with_capacity(deductions.len());
        for deduction in deductions {
            let overflow = || KitError::QuantityOverflow {
                key: key.clone(),
                component_id: deduction.component_id.clone(),
            };
            let on_hand = self
                .on_hand(&deduction.component_id)
                .checked_sub(deduction.quantity)
                .ok_or_else(overflow)?;
            let issued = self
                .issued(key, &deduction.component_id)
                .checked_add(deduction.quantity)
                .ok_or_else(overflow)?;
            updates.push((deduction, on_hand, issued));
        }

        let ledger = self.issued.entry(key.clone()).or_default();
        for (deduction, on_hand, issued) in updates {
            self.on_hand.insert(deduction.component_id.clone(), on_hand);
            ledger.insert(deduction.component_id.clone(), issued);

            tracing::debug!(
                "扣減 {} 物料 {}: {} (剩餘 {})",
                key,
                deduction.component_id,
                deduction.quantity,
                on_hand
            );
        }
        Ok(())
    }

    /// 庫存為負的物料（排序），即強制扣減下的累積缺口
    pub fn negative_components(&self) -> Vec<(String, Decimal)> {
        let mut negatives: Vec<(String, Decimal)> = self
            .on_hand
            .iter()
            .filter(|(_, qty)| **qty < Decimal::ZERO)
            .map(|(component_id, qty)| (component_id.clone(), *qty))
            .collect();
        negatives.sort_by(|a, b| a.0.cmp(&b.0));
        negatives
    }
}
