//! 工單可領上限

use kitting_core::{KitError, WorkOrder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::floor_sets;
use crate::state::AllocationState;

/// 工單尚可生產的套數上限
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ceiling {
    /// 受已領用量限制
    Bounded(u64),
    /// 沒有任何單位用量大於 0 的明細，不受限制
    Unbounded,
}

impl Ceiling {
    /// 把計劃產量截到上限，回傳 (淨需求, 超出數量)
    pub fn clamp(self, planned_quantity: u64) -> (u64, u64) {
        let net_demand = match self {
            Ceiling::Bounded(limit) => planned_quantity.min(limit),
            Ceiling::Unbounded => planned_quantity,
        };
        (net_demand, planned_quantity - net_demand)
    }
}

/// 計算工單上限
///
/// 每筆單位用量大於 0 的明細：尚可領用 = max(0, 需領用 - 累計已領用)，
/// 可做套數 = floor(尚可領用 / 單位用量)；上限取最小值。
/// 沒有 BOM 明細的工單回傳錯誤，不能當成不受限制。
pub fn resolve_ceiling(order: &WorkOrder, state: &AllocationState) -> kitting_core::Result<Ceiling> {
    if !order.has_bom() {
        return Err(KitError::EmptyBom(order.key.clone()));
    }

    let mut ceiling = Ceiling::Unbounded;
    for (line, unit_usage) in order.consuming_lines()? {
        let issued = state.issued(&order.key, &line.component_id);
        let remaining = line
            .required_qty
            .checked_sub(issued)
            .ok_or_else(|| KitError::QuantityOverflow {
                key: order.key.clone(),
                component_id: line.component_id.clone(),
            })?
            .max(Decimal::ZERO);
        let sets = floor_sets(remaining, unit_usage);
        ceiling = match ceiling {
            Ceiling::Bounded(limit) => Ceiling::Bounded(limit.min(sets)),
            Ceiling::Unbounded => Ceiling::Bounded(sets),
        };
    }

    Ok(ceiling)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitting_core::{BomLine, InventorySnapshot, WorkOrderDirectory, WorkOrderKey};
    use rstest::rstest;

    fn resolve(order: WorkOrder) -> kitting_core::Result<Ceiling> {
        let directory: WorkOrderDirectory = vec![order.clone()].into();
        let state = AllocationState::new(&InventorySnapshot::new(), &directory);
        resolve_ceiling(&order, &state)
    }

    fn order_with(lines: Vec<BomLine>) -> WorkOrder {
        let mut order = WorkOrder::new(WorkOrderKey::new("5101", "001"), Decimal::from(100));
        for line in lines {
            order.add_bom_line(line);
        }
        order
    }

    #[test]
    fn test_fresh_work_order() {
        let order = order_with(vec![BomLine::new(
            "C1".to_string(),
            Decimal::from(50),
            Decimal::ZERO,
        )]);
        assert_eq!(resolve(order).unwrap(), Ceiling::Bounded(100));
    }

    #[test]
    fn test_fully_issued_work_order() {
        let order = order_with(vec![BomLine::new(
            "C1".to_string(),
            Decimal::from(50),
            Decimal::from(50),
        )]);
        assert_eq!(resolve(order).unwrap(), Ceiling::Bounded(0));
    }

    #[test]
    fn test_binding_component_wins() {
        // C1 還可做 80 套，C2 只剩 40 套
        let order = order_with(vec![
            BomLine::new("C1".to_string(), Decimal::from(100), Decimal::from(20)),
            BomLine::new("C2".to_string(), Decimal::from(200), Decimal::from(120)),
        ]);
        assert_eq!(resolve(order).unwrap(), Ceiling::Bounded(40));
    }

    #[test]
    fn test_over_issued_clamps_to_zero() {
        let order = order_with(vec![BomLine::new(
            "C1".to_string(),
            Decimal::from(50),
            Decimal::from(60),
        )]);
        assert_eq!(resolve(order).unwrap(), Ceiling::Bounded(0));
    }

    #[test]
    fn test_zero_usage_is_unbounded() {
        let mut order = order_with(vec![BomLine::new(
            "C1".to_string(),
            Decimal::from(50),
            Decimal::ZERO,
        )]);
        order.total_order_qty = Decimal::ZERO;
        assert_eq!(resolve(order).unwrap(), Ceiling::Unbounded);
    }

    #[test]
    fn test_repeated_component_uses_last_issued_amount() {
        // 同一物料兩筆明細：已領用量以最後一筆為準（0），兩筆都還可做 10 套
        let mut order = order_with(vec![
            BomLine::new("A".to_string(), Decimal::from(10), Decimal::from(10)),
            BomLine::new("A".to_string(), Decimal::from(20), Decimal::ZERO),
        ]);
        order.total_order_qty = Decimal::from(10);
        assert_eq!(resolve(order).unwrap(), Ceiling::Bounded(10));
    }

    #[test]
    fn test_empty_bom_is_error() {
        let err = resolve(order_with(vec![])).unwrap_err();
        assert!(matches!(err, KitError::EmptyBom(_)));
    }

    #[rstest]
    #[case(Ceiling::Bounded(100), 60, (60, 0))]
    #[case(Ceiling::Bounded(40), 60, (40, 20))]
    #[case(Ceiling::Bounded(0), 60, (0, 60))]
    #[case(Ceiling::Unbounded, 60, (60, 0))]
    fn test_clamp(#[case] ceiling: Ceiling, #[case] planned: u64, #[case] expected: (u64, u64)) {
        assert_eq!(ceiling.clamp(planned), expected);
    }
}
