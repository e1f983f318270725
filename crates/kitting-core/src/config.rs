//! 齊套計算配置

use serde::{Deserialize, Serialize};

/// 齊套計算參數配置（每次計算固定一份）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KittingConfig {
    /// 庫存扣減策略
    pub deduction_policy: DeductionPolicy,

    /// 行報表是否在訊息前加上 `[MM-DD]` 日期標籤
    pub date_tag: DateTagMode,

    /// 是否在結果中保留計算結束時的庫存/已領用狀態（除錯用）
    pub keep_final_state: bool,
}

impl KittingConfig {
    /// 創建預設配置（強制扣減、自動日期標籤）
    pub fn new() -> Self {
        Self {
            deduction_policy: DeductionPolicy::Forced,
            date_tag: DateTagMode::Auto,
            keep_final_state: false,
        }
    }

    /// 建構器模式：設置扣減策略
    ///
    /// # 範例
    /// ```
    /// # use kitting_core::{DeductionPolicy, KittingConfig};
    /// let config = KittingConfig::new()
    ///     .with_deduction_policy(DeductionPolicy::Conservative); // 未齊套不扣庫存
    /// assert_eq!(config.deduction_policy, DeductionPolicy::Conservative);
    /// ```
    pub fn with_deduction_policy(mut self, policy: DeductionPolicy) -> Self {
        self.deduction_policy = policy;
        self
    }

    /// 建構器模式：設置日期標籤模式
    pub fn with_date_tag(mut self, date_tag: DateTagMode) -> Self {
        self.date_tag = date_tag;
        self
    }

    /// 建構器模式：設置是否保留最終狀態
    pub fn with_keep_final_state(mut self, keep: bool) -> Self {
        self.keep_final_state = keep;
        self
    }

    /// 從 JSON 載入配置，缺少的欄位使用預設值
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for KittingConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// 庫存扣減策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionPolicy {
    /// 保守（全有或全無）：只有整行齊套時才扣減淨需求，否則保留庫存給後續計劃
    Conservative,

    /// 強制扣減：無論是否缺料都扣減計劃產量對應的用量，庫存可為負，
    /// 讓後續日期看到真實的消耗
    #[default]
    Forced,
}

/// 日期標籤模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateTagMode {
    /// 計劃跨越多個日期時才加標籤
    #[default]
    Auto,
    /// 一律加標籤
    Always,
    /// 不加標籤
    Never,
}
