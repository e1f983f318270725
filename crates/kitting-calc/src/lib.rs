//! # Kitting Calculation Engine
//!
//! 滾動式齊套計算引擎：依日期順序逐行計算計劃的齊套率、可產數量與缺料，
//! 並將每行的消耗寫回共享的庫存/已領用狀態，供後續計劃行使用。

pub mod calculator;
pub mod ceiling;
pub mod report;
pub mod shortage;
pub mod state;
pub mod status;

// Re-export 主要類型
pub use calculator::{KittingCalculator, KittingRun, RunSummary};
pub use ceiling::Ceiling;
pub use report::RowReport;
pub use shortage::{Deduction, Detection, Shortage};
pub use state::AllocationState;
pub use status::KitStatus;

use chrono::NaiveDate;
use kitting_core::{PlanLine, WorkOrderKey};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// 庫存與需求比較的絕對容差（0.0001）
pub const TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 4);

/// 齊套率門檻（0.999），低於此值視為缺料
pub const FULL_KIT_THRESHOLD: Decimal = Decimal::from_parts(999, 0, 0, false, 3);

/// 可做套數 = floor(數量 / 單位用量)
///
/// 商數先加上容差再取整，避免 1/3 這類除法的捨入誤差少算一套。
pub(crate) fn floor_sets(quantity: Decimal, unit_usage: Decimal) -> u64 {
    if quantity <= Decimal::ZERO {
        return 0;
    }
    quantity
        .checked_div(unit_usage)
        .and_then(|sets| sets.checked_add(TOLERANCE))
        .and_then(|sets| sets.floor().to_u64())
        .unwrap_or(u64::MAX)
}

/// 單行齊套計算結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// 排產日期
    pub date: NaiveDate,

    /// 工單鍵
    pub work_order_key: WorkOrderKey,

    /// 來源列號
    pub source_row: usize,

    /// 計劃產量
    pub planned_quantity: u64,

    /// 齊套率（0 ~ 1）
    pub kitting_rate: Decimal,

    /// 可產數量
    pub achievable_qty: u64,

    /// 工單淨需求量（計劃產量截到工單上限）
    pub net_demand: u64,

    /// 超出工單的數量
    pub excess_qty: u64,

    /// 缺料明細
    pub shortages: Vec<Shortage>,

    /// 狀態
    pub status: KitStatus,

    /// 錯誤原因（僅 ERROR 狀態）
    pub error: Option<String>,
}

impl AllocationResult {
    /// 無法計算的計劃行：整行視為超出工單，齊套率 0
    pub fn error(line: &PlanLine, reason: String) -> Self {
        Self {
            date: line.date,
            work_order_key: line.work_order_key.clone(),
            source_row: line.source_row,
            planned_quantity: line.planned_quantity,
            kitting_rate: Decimal::ZERO,
            achievable_qty: 0,
            net_demand: 0,
            excess_qty: line.planned_quantity,
            shortages: Vec::new(),
            status: KitStatus::Error,
            error: Some(reason),
        }
    }

    /// 齊套率百分比（四捨五入到整數）
    pub fn rate_percent(&self) -> u32 {
        (self.kitting_rate * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .unwrap_or(0)
    }

    /// 顯示訊息
    pub fn message(&self) -> String {
        if let Some(reason) = &self.error {
            return format!("kitting error: {}", reason);
        }

        let detail = if self.shortages.is_empty() {
            "none".to_string()
        } else {
            self.shortages
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(",")
        };

        format!(
            "kitting rate {}%; achievable quantity {}; work-order net demand {}; quantity exceeding the work order {}; shortage detail: {}",
            self.rate_percent(),
            self.achievable_qty,
            self.net_demand,
            self.excess_qty,
            detail
        )
    }
}
