//! 齊套狀態分類

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::FULL_KIT_THRESHOLD;

/// 計劃行的齊套狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum KitStatus {
    /// 齊套且未超出工單
    Ok,
    /// 工單已領完，整個計劃都超出工單
    Finished,
    /// 齊套但部分計劃超出工單
    Warn,
    /// 缺料
    Short,
    /// 找不到工單或工單無 BOM
    Error,
}

impl KitStatus {
    /// 多行合併到同一列時的顯示優先級（越大越優先）
    pub fn display_priority(self) -> u8 {
        match self {
            KitStatus::Ok => 1,
            KitStatus::Finished => 2,
            KitStatus::Warn => 3,
            KitStatus::Short => 4,
            KitStatus::Error => 5,
        }
    }

    /// 取優先級最高的狀態
    pub fn most_severe<I: IntoIterator<Item = KitStatus>>(statuses: I) -> Option<KitStatus> {
        statuses.into_iter().max_by_key(|s| s.display_priority())
    }

    /// 標記底色（RGB 十六進位）
    pub fn fill_color(self) -> &'static str {
        match self {
            KitStatus::Ok => "CCFFCC",
            KitStatus::Finished => "DDDDDD",
            KitStatus::Warn => "FFFFCC",
            KitStatus::Short | KitStatus::Error => "FFCCCC",
        }
    }
}

impl fmt::Display for KitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            KitStatus::Ok => "OK",
            KitStatus::Finished => "FINISHED",
            KitStatus::Warn => "WARN",
            KitStatus::Short => "SHORT",
            KitStatus::Error => "ERROR",
        };
        f.write_str(label)
    }
}

/// 依淨需求、超出數量與齊套率分類
///
/// 判斷順序：先看工單是否已領完，再看齊套率，最後看是否超出工單。
/// ERROR 由計算器在查無工單/BOM 時直接指定，不經過此函數。
pub fn classify(net_demand: u64, excess_qty: u64, kitting_rate: Decimal) -> KitStatus {
    if net_demand == 0 && excess_qty > 0 {
        KitStatus::Finished
    } else if kitting_rate < FULL_KIT_THRESHOLD {
        KitStatus::Short
    } else if excess_qty > 0 {
        KitStatus::Warn
    } else {
        KitStatus::Ok
    }
}
