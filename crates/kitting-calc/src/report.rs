//! 來源列彙總
//!
//! 同一來源列在多個日期都有排產時，各日期的結果合併成一列，
//! 標記取優先級最高的狀態。

use kitting_core::DateTagMode;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::status::KitStatus;
use crate::AllocationResult;

/// 單一來源列的彙總
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowReport {
    /// 來源列號
    pub source_row: usize,

    /// 各行訊息（處理順序）
    pub messages: Vec<String>,

    /// 列標記狀態
    pub status: KitStatus,
}

impl RowReport {
    /// 由逐行結果建立列彙總（依來源列號排序）
    pub fn build(results: &[AllocationResult], date_tag: DateTagMode) -> Vec<RowReport> {
        let tagged = match date_tag {
            DateTagMode::Always => true,
            DateTagMode::Never => false,
            DateTagMode::Auto => {
                results
                    .iter()
                    .map(|r| r.date)
                    .collect::<BTreeSet<_>>()
                    .len()
                    > 1
            }
        };

        let mut rows: BTreeMap<usize, RowReport> = BTreeMap::new();
        for result in results {
            let message = if tagged {
                format!("[{}] {}", result.date.format("%m-%d"), result.message())
            } else {
                result.message()
            };

            let row = rows.entry(result.source_row).or_insert_with(|| RowReport {
                source_row: result.source_row,
                messages: Vec::new(),
                status: result.status,
            });
            row.messages.push(message);
            if result.status.display_priority() > row.status.display_priority() {
                row.status = result.status;
            }
        }

        rows.into_values().collect()
    }

    /// 合併後的儲存格文字（換行分隔）
    pub fn text(&self) -> String {
        self.messages.join("\n")
    }
}
