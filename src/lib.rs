//! # Kitting
//!
//! 每日排產齊套分析：依日期滾動扣減庫存，計算每行計劃的齊套率、
//! 可產數量與缺料明細。
//!
//! 資料模型在 [`model`]，計算引擎在 [`engine`]。

pub use kitting_calc as engine;
pub use kitting_core as model;

pub use kitting_calc::{
    AllocationResult, AllocationState, Ceiling, KitStatus, KittingCalculator, KittingRun,
    RowReport, RunSummary, Shortage,
};
pub use kitting_core::{
    BomLine, DateTagMode, DeductionPolicy, InventorySnapshot, KitError, KittingConfig, PlanLine,
    WorkOrder, WorkOrderDirectory, WorkOrderKey,
};
