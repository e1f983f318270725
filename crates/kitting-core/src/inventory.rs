//! 庫存快照模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 庫存快照（物料 -> 現有庫存）
///
/// 計算開始前一次取得；查無資料的物料視為 0。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventorySnapshot {
    on_hand: HashMap<String, Decimal>,
}

impl InventorySnapshot {
    /// 創建空快照
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置物料庫存
    pub fn with_quantity(mut self, component_id: String, on_hand_qty: Decimal) -> Self {
        self.on_hand.insert(component_id, on_hand_qty);
        self
    }

    /// 累加物料庫存（多倉庫合計，超出範圍時封頂）
    pub fn add(&mut self, component_id: String, on_hand_qty: Decimal) {
        let total = self.on_hand.entry(component_id).or_insert(Decimal::ZERO);
        *total = total.saturating_add(on_hand_qty);
    }

    /// 合併另一批查詢結果
    pub fn merge(&mut self, other: InventorySnapshot) {
        for (component_id, qty) in other.on_hand {
            self.add(component_id, qty);
        }
    }

    /// 查詢現有庫存（缺省為 0）
    pub fn on_hand(&self, component_id: &str) -> Decimal {
        self.on_hand
            .get(component_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn len(&self) -> usize {
        self.on_hand.len()
    }

    pub fn is_empty(&self) -> bool {
        self.on_hand.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Decimal)> {
        self.on_hand.iter()
    }
}

impl FromIterator<(String, Decimal)> for InventorySnapshot {
    fn from_iter<I: IntoIterator<Item = (String, Decimal)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (component_id, qty) in iter {
            snapshot.add(component_id, qty);
        }
        snapshot
    }
}
