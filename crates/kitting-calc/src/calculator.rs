//! 滾動齊套主計算器

use kitting_core::{
    DateTagMode, InventorySnapshot, KitError, KittingConfig, PlanLine, WorkOrderDirectory,
};
use rust_decimal::Decimal;

use crate::ceiling::resolve_ceiling;
use crate::report::RowReport;
use crate::shortage::detect;
use crate::state::AllocationState;
use crate::status::{classify, KitStatus};
use crate::AllocationResult;

/// 齊套計算器
pub struct KittingCalculator {
    /// 計算配置
    config: KittingConfig,
}

impl KittingCalculator {
    /// 創建新的齊套計算器
    pub fn new(config: KittingConfig) -> Self {
        Self { config }
    }

    /// 主計算入口
    ///
    /// 計劃行依日期遞增、同日期保持原始順序處理；每行計算完畢後把扣減寫回
    /// 共享狀態，後續行看到的是累積消耗後的庫存與已領用量。
    /// 查無工單、工單無 BOM 或數量溢位的行輸出 ERROR，不寫回狀態，不影響其他行。
    pub fn calculate(
        &self,
        plan_lines: &[PlanLine],
        directory: &WorkOrderDirectory,
        snapshot: &InventorySnapshot,
    ) -> KittingRun {
        tracing::info!(
            "開始齊套計算：計劃 {} 行，工單 {} 張，庫存物料 {} 筆，扣減策略 {:?}",
            plan_lines.len(),
            directory.len(),
            snapshot.len(),
            self.config.deduction_policy
        );

        let start_time = std::time::Instant::now();

        // Step 1: 排序（日期遞增，穩定排序保留同日原始順序）
        tracing::debug!("Step 1: 計劃行排序");
        let ordered = Self::processing_order(plan_lines);

        // Step 2: 建立共享狀態
        tracing::debug!("Step 2: 初始化庫存/已領用狀態");
        let mut state = AllocationState::new(snapshot, directory);

        // Step 3: 逐行計算並寫回
        tracing::debug!("Step 3: 逐行計算");
        let mut results = Vec::with_capacity(ordered.len());
        for line in ordered {
            let result = match self.evaluate_line(line, directory, &mut state) {
                Ok(result) => result,
                Err(err) => {
                    tracing::warn!(
                        "計劃行 {} ({}) 無法計算: {}",
                        line.source_row,
                        line.date,
                        err
                    );
                    AllocationResult::error(line, err.to_string())
                }
            };
            results.push(result);
        }

        let run = KittingRun {
            results,
            date_tag: self.config.date_tag,
            final_state: self.config.keep_final_state.then_some(state),
            calculation_time_ms: Some(start_time.elapsed().as_millis()),
        };

        let summary = run.summary();
        tracing::info!("齊套計算完成，耗時 {:?}", start_time.elapsed());
        tracing::info!(
            "OK {} / WARN {} / SHORT {} / FINISHED {} / ERROR {}",
            summary.ok,
            summary.warn,
            summary.short,
            summary.finished,
            summary.error
        );

        run
    }

    /// 單行計算：上限 → 齊套/缺料 → 狀態 → 寫回
    fn evaluate_line(
        &self,
        line: &PlanLine,
        directory: &WorkOrderDirectory,
        state: &mut AllocationState,
    ) -> kitting_core::Result<AllocationResult> {
        let order = directory
            .get(&line.work_order_key)
            .ok_or_else(|| KitError::WorkOrderNotFound(line.work_order_key.clone()))?;

        let ceiling = resolve_ceiling(order, state)?;
        let (net_demand, excess_qty) = ceiling.clamp(line.planned_quantity);

        let detection = detect(
            order,
            net_demand,
            line.planned_quantity,
            state,
            self.config.deduction_policy,
        )?;
        let status = classify(net_demand, excess_qty, detection.kitting_rate);

        tracing::debug!(
            "{} {} 計劃 {}: 上限 {:?}, 淨需求 {}, 超出 {}, 齊套率 {}, 可產 {}, 狀態 {}",
            line.date,
            line.work_order_key,
            line.planned_quantity,
            ceiling,
            net_demand,
            excess_qty,
            detection.kitting_rate.round_dp(4),
            detection.achievable_qty,
            status
        );

        state.commit(&line.work_order_key, &detection.deductions)?;

        Ok(AllocationResult {
            date: line.date,
            work_order_key: line.work_order_key.clone(),
            source_row: line.source_row,
            planned_quantity: line.planned_quantity,
            kitting_rate: detection.kitting_rate,
            achievable_qty: detection.achievable_qty,
            net_demand,
            excess_qty,
            shortages: detection.shortages,
            status,
            error: None,
        })
    }

    /// 處理順序：日期遞增，同日期保持輸入順序
    fn processing_order(plan_lines: &[PlanLine]) -> Vec<&PlanLine> {
        let mut ordered: Vec<&PlanLine> = plan_lines.iter().collect();
        ordered.sort_by_key(|line| line.date);
        ordered
    }

    /// 獲取配置引用
    pub fn config(&self) -> &KittingConfig {
        &self.config
    }
}

impl Default for KittingCalculator {
    fn default() -> Self {
        Self::new(KittingConfig::default())
    }
}

/// 一次齊套計算的結果
#[derive(Debug, Clone)]
pub struct KittingRun {
    /// 逐行結果（處理順序）
    pub results: Vec<AllocationResult>,

    /// 行報表的日期標籤模式
    pub date_tag: DateTagMode,

    /// 計算結束時的狀態（配置 keep_final_state 時保留）
    pub final_state: Option<AllocationState>,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl KittingRun {
    /// 按來源列彙總
    pub fn row_reports(&self) -> Vec<RowReport> {
        RowReport::build(&self.results, self.date_tag)
    }

    /// 統計各狀態行數與數量
    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary::default();
        for result in &self.results {
            match result.status {
                KitStatus::Ok => summary.ok += 1,
                KitStatus::Finished => summary.finished += 1,
                KitStatus::Warn => summary.warn += 1,
                KitStatus::Short => summary.short += 1,
                KitStatus::Error => summary.error += 1,
            }
            summary.total_planned = summary
                .total_planned
                .saturating_add(result.planned_quantity);
            summary.total_achievable = summary
                .total_achievable
                .saturating_add(result.achievable_qty);
        }
        summary
    }

    /// 最低齊套率（不含 ERROR 行），沒有可計算的行時為 None
    pub fn min_kitting_rate(&self) -> Option<Decimal> {
        self.results
            .iter()
            .filter(|r| r.status != KitStatus::Error)
            .map(|r| r.kitting_rate)
            .min()
    }
}

/// 計算摘要
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ok: usize,
    pub warn: usize,
    pub short: usize,
    pub finished: usize,
    pub error: usize,
    pub total_planned: u64,
    pub total_achievable: u64,
}
