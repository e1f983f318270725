//! 排產計劃模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::work_order::WorkOrderKey;

/// 排產計劃行（某一天、某張工單的計劃產量）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanLine {
    /// 排產日期
    pub date: NaiveDate,

    /// 工單鍵
    pub work_order_key: WorkOrderKey,

    /// 計劃產量
    pub planned_quantity: u64,

    /// 車間
    pub workshop: String,

    /// 來源文件中的列號（同一列可能對應多個日期）
    pub source_row: usize,

    /// 原樣保留的顯示欄位，計算時不解讀
    pub display_fields: Vec<Option<String>>,
}

impl PlanLine {
    /// 創建新的計劃行
    pub fn new(date: NaiveDate, work_order_key: WorkOrderKey, planned_quantity: u64) -> Self {
        Self {
            date,
            work_order_key,
            planned_quantity,
            workshop: String::new(),
            source_row: 0,
            display_fields: Vec::new(),
        }
    }

    /// 建構器模式：設置車間
    pub fn with_workshop(mut self, workshop: String) -> Self {
        self.workshop = workshop;
        self
    }

    /// 建構器模式：設置來源列號
    pub fn with_source_row(mut self, source_row: usize) -> Self {
        self.source_row = source_row;
        self
    }

    /// 建構器模式：設置顯示欄位
    pub fn with_display_fields(mut self, display_fields: Vec<Option<String>>) -> Self {
        self.display_fields = display_fields;
        self
    }

    /// 將來源儲存格的數量轉為計劃產量
    ///
    /// 只接受大於 0 的數量，四捨五入採銀行家捨入（與來源表格工具一致）。
    pub fn planned_quantity_from(raw: Decimal) -> Option<u64> {
        if raw <= Decimal::ZERO {
            return None;
        }
        raw.round().to_u64().filter(|qty| *qty > 0)
    }
}
