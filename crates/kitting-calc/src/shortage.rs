//! 齊套率與缺料計算

use kitting_core::{DeductionPolicy, KitError, WorkOrder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::state::AllocationState;
use crate::{floor_sets, FULL_KIT_THRESHOLD, TOLERANCE};

/// 缺料明細
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shortage {
    /// 物料ID
    pub component_id: String,

    /// 品名
    pub display_name: String,

    /// 單位
    pub unit: String,

    /// 缺少數量
    pub shortfall: Decimal,
}

impl fmt::Display for Shortage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.display_name.is_empty() {
            write!(f, "{}", self.component_id)?;
        } else {
            write!(f, "{}({})", self.display_name, self.component_id)?;
        }
        write!(
            f,
            " short {}{}",
            self.shortfall.round_dp(4).normalize(),
            self.unit
        )
    }
}

/// 扣減計劃中的一筆：從庫存扣除、加到工單已領用
#[derive(Debug, Clone, PartialEq)]
pub struct Deduction {
    pub component_id: String,
    pub quantity: Decimal,
}

/// 單行偵測結果
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// 齊套率（瓶頸物料決定）
    pub kitting_rate: Decimal,

    /// 可產數量
    pub achievable_qty: u64,

    /// 缺料明細（依 BOM 順序）
    pub shortages: Vec<Shortage>,

    /// 扣減計劃（同一物料已合併）
    pub deductions: Vec<Deduction>,
}

impl Detection {
    /// 是否整行齊套（與狀態分類使用同一門檻）
    pub fn is_fully_kitted(&self) -> bool {
        self.kitting_rate >= FULL_KIT_THRESHOLD
    }
}

/// 以目前庫存計算一行計劃的齊套率、可產數量、缺料與扣減計劃
///
/// 每筆單位用量大於 0 的明細：
/// - 明細淨需求 = 淨需求 × 單位用量
/// - 齊套率貢獻 = clamp(max(0, 庫存) / 明細淨需求, 0, 1)，無需求時為 1
/// - 可做套數 = floor(max(0, 庫存) / 單位用量)
/// - 庫存 < 明細淨需求 - 容差 時記缺料
///
/// 乘積或累加超出數值範圍時回傳 [`KitError::QuantityOverflow`]。
pub fn detect(
    order: &WorkOrder,
    net_demand: u64,
    planned_quantity: u64,
    state: &AllocationState,
    policy: DeductionPolicy,
) -> kitting_core::Result<Detection> {
    let net = Decimal::from(net_demand);
    let planned = Decimal::from(planned_quantity);

    let mut kitting_rate = Decimal::ONE;
    let mut component_sets = u64::MAX;
    let mut shortages = Vec::new();
    let mut demanded: Vec<Deduction> = Vec::new();

    for (line, unit_usage) in order.consuming_lines()? {
        let part_net_demand = net
            .checked_mul(unit_usage)
            .ok_or_else(|| overflow(order, &line.component_id))?;
        let stock = state.on_hand(&line.component_id).max(Decimal::ZERO);

        if part_net_demand > Decimal::ZERO {
            let rate = stock
                .checked_div(part_net_demand)
                .map_or(Decimal::ONE, |rate| rate.min(Decimal::ONE));
            kitting_rate = kitting_rate.min(rate);
        }

        component_sets = component_sets.min(floor_sets(stock, unit_usage));

        if stock < part_net_demand - TOLERANCE {
            shortages.push(Shortage {
                component_id: line.component_id.clone(),
                display_name: line.display_name.clone(),
                unit: line.unit.clone(),
                shortfall: part_net_demand - stock,
            });
        }

        let quantity = match policy {
            DeductionPolicy::Conservative => part_net_demand,
            DeductionPolicy::Forced => planned
                .checked_mul(unit_usage)
                .ok_or_else(|| overflow(order, &line.component_id))?,
        };
        accumulate(&mut demanded, &line.component_id, quantity)
            .ok_or_else(|| overflow(order, &line.component_id))?;
    }

    let mut detection = Detection {
        kitting_rate,
        achievable_qty: net_demand.min(component_sets),
        shortages,
        deductions: Vec::new(),
    };

    detection.deductions = match policy {
        DeductionPolicy::Forced => demanded,
        DeductionPolicy::Conservative if detection.is_fully_kitted() => demanded,
        DeductionPolicy::Conservative => Vec::new(),
    };

    Ok(detection)
}

fn overflow(order: &WorkOrder, component_id: &str) -> KitError {
    KitError::QuantityOverflow {
        key: order.key.clone(),
        component_id: component_id.to_string(),
    }
}

/// 同一物料的扣減合併；累加溢位時回傳 None
fn accumulate(
    deductions: &mut Vec<Deduction>,
    component_id: &str,
    quantity: Decimal,
) -> Option<()> {
    if quantity <= Decimal::ZERO {
        return Some(());
    }
    match deductions.iter_mut().find(|d| d.component_id == component_id) {
        Some(existing) => existing.quantity = existing.quantity.checked_add(quantity)?,
        None => deductions.push(Deduction {
            component_id: component_id.to_string(),
            quantity,
        }),
    }
    Some(())
}
