//! # Kitting Core
//!
//! 齊套分析的核心資料模型與類型定義

pub mod config;
pub mod inventory;
pub mod plan;
pub mod work_order;

// Re-export 主要類型
pub use config::{DateTagMode, DeductionPolicy, KittingConfig};
pub use inventory::InventorySnapshot;
pub use plan::PlanLine;
pub use work_order::{BomLine, WorkOrder, WorkOrderDirectory, WorkOrderKey};

/// 齊套計算錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum KitError {
    #[error("work order {0} not found in order-tracking data")]
    WorkOrderNotFound(WorkOrderKey),

    #[error("work order {0} has no BOM lines")]
    EmptyBom(WorkOrderKey),

    #[error("quantity overflow in work order {key} for component {component_id}")]
    QuantityOverflow {
        key: WorkOrderKey,
        component_id: String,
    },

    #[error("invalid configuration: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, KitError>;
