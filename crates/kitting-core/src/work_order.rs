//! 工單與 BOM 模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::{KitError, Result};

/// 工單鍵（單別 + 單號）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkOrderKey {
    /// 單別
    pub order_type: String,

    /// 單號
    pub order_no: String,
}

impl WorkOrderKey {
    /// 創建新的工單鍵（去除前後空白）
    pub fn new(order_type: &str, order_no: &str) -> Self {
        Self {
            order_type: order_type.trim().to_string(),
            order_no: order_no.trim().to_string(),
        }
    }
}

impl fmt::Display for WorkOrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.order_type, self.order_no)
    }
}

/// 工單用料明細
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BomLine {
    /// 物料ID
    pub component_id: String,

    /// 品名
    pub display_name: String,

    /// 單位
    pub unit: String,

    /// 整張工單的需領用量
    pub required_qty: Decimal,

    /// 已領用量（累計）
    pub issued_qty: Decimal,
}

impl BomLine {
    /// 創建新的用料明細
    pub fn new(component_id: String, required_qty: Decimal, issued_qty: Decimal) -> Self {
        Self {
            component_id,
            display_name: String::new(),
            unit: String::new(),
            required_qty,
            issued_qty,
        }
    }

    /// 建構器模式：設置品名
    pub fn with_display_name(mut self, display_name: String) -> Self {
        self.display_name = display_name;
        self
    }

    /// 建構器模式：設置單位
    pub fn with_unit(mut self, unit: String) -> Self {
        self.unit = unit;
        self
    }
}

/// 工單（來自訂單追蹤系統，唯讀）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkOrder {
    /// 工單鍵
    pub key: WorkOrderKey,

    /// 預計產量
    pub total_order_qty: Decimal,

    /// 用料明細
    pub bom_lines: Vec<BomLine>,
}

impl WorkOrder {
    /// 創建新的工單
    pub fn new(key: WorkOrderKey, total_order_qty: Decimal) -> Self {
        Self {
            key,
            total_order_qty,
            bom_lines: Vec::new(),
        }
    }

    /// 建構器模式：加入用料明細
    pub fn with_bom_line(mut self, line: BomLine) -> Self {
        self.bom_lines.push(line);
        self
    }

    /// 添加用料明細
    pub fn add_bom_line(&mut self, line: BomLine) {
        self.bom_lines.push(line);
    }

    /// 檢查是否有 BOM 資料
    pub fn has_bom(&self) -> bool {
        !self.bom_lines.is_empty()
    }

    /// 單位用量 = 需領用量 / 預計產量
    ///
    /// 預計產量不大於 0 時回傳 0，該明細不參與任何計算。
    /// 商超出數值範圍時回傳 [`KitError::QuantityOverflow`]。
    pub fn unit_usage(&self, line: &BomLine) -> Result<Decimal> {
        if self.total_order_qty <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        line.required_qty
            .checked_div(self.total_order_qty)
            .ok_or_else(|| KitError::QuantityOverflow {
                key: self.key.clone(),
                component_id: line.component_id.clone(),
            })
    }

    /// 單位用量大於 0 的明細（依 BOM 順序）
    pub fn consuming_lines(&self) -> Result<Vec<(&BomLine, Decimal)>> {
        let mut lines = Vec::with_capacity(self.bom_lines.len());
        for line in &self.bom_lines {
            let usage = self.unit_usage(line)?;
            if usage > Decimal::ZERO {
                lines.push((line, usage));
            }
        }
        Ok(lines)
    }
}

/// 工單目錄
///
/// 序列化為工單列表（依工單鍵排序）。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<WorkOrder>", into = "Vec<WorkOrder>")]
pub struct WorkOrderDirectory {
    orders: HashMap<WorkOrderKey, WorkOrder>,
}

impl WorkOrderDirectory {
    /// 創建空目錄
    pub fn new() -> Self {
        Self::default()
    }

    /// 加入（或覆蓋）工單
    pub fn insert(&mut self, order: WorkOrder) {
        self.orders.insert(order.key.clone(), order);
    }

    /// 逐列匯入查詢結果：一列代表工單的一筆用料明細
    ///
    /// 同一工單的多列會累加到同一張工單上，預計產量以最後一列為準。
    pub fn push_bom_row(&mut self, key: WorkOrderKey, total_order_qty: Decimal, line: BomLine) {
        let order = self
            .orders
            .entry(key.clone())
            .or_insert_with(|| WorkOrder::new(key, total_order_qty));
        order.total_order_qty = total_order_qty;
        order.add_bom_line(line);
    }

    /// 查詢工單
    pub fn get(&self, key: &WorkOrderKey) -> Option<&WorkOrder> {
        self.orders.get(key)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// 目錄中所有工單引用到的物料（排序、去重），供庫存查詢使用
    pub fn component_ids(&self) -> Vec<String> {
        self.orders
            .values()
            .flat_map(|order| order.bom_lines.iter())
            .map(|line| line.component_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorkOrder> {
        self.orders.values()
    }
}

impl FromIterator<WorkOrder> for WorkOrderDirectory {
    fn from_iter<I: IntoIterator<Item = WorkOrder>>(iter: I) -> Self {
        let mut directory = Self::new();
        for order in iter {
            directory.insert(order);
        }
        directory
    }
}

impl From<Vec<WorkOrder>> for WorkOrderDirectory {
    fn from(orders: Vec<WorkOrder>) -> Self {
        orders.into_iter().collect()
    }
}

impl From<WorkOrderDirectory> for Vec<WorkOrder> {
    fn from(directory: WorkOrderDirectory) -> Self {
        let mut orders: Vec<WorkOrder> = directory.orders.into_values().collect();
        orders.sort_by(|a, b| a.key.cmp(&b.key));
        orders
    }
}
