//! 滾動齊套計算示例
//!
//! 執行：`RUST_LOG=debug cargo run --example rolling_kitting`

use chrono::NaiveDate;
use kitting::{
    BomLine, InventorySnapshot, KitStatus, KittingCalculator, KittingConfig, PlanLine, WorkOrder,
    WorkOrderDirectory, WorkOrderKey,
};
use rust_decimal::Decimal;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();

    println!("=== 滾動齊套計算示例 ===\n");

    // ========== 1. 工單與用料 ==========
    println!("🔧 步驟 1: 載入工單");
    let mut directory = WorkOrderDirectory::new();
    let fan = WorkOrderKey::new("5101", "20251101");
    let lamp = WorkOrderKey::new("5101", "20251102");
    let heater = WorkOrderKey::new("5102", "20251015");

    // 風扇：總量 200
    directory.push_bom_row(
        fan.clone(),
        Decimal::from(200),
        BomLine::new("M-100".to_string(), Decimal::from(200), Decimal::ZERO)
            .with_display_name("Motor".to_string())
            .with_unit("pcs".to_string()),
    );
    directory.push_bom_row(
        fan.clone(),
        Decimal::from(200),
        BomLine::new("S-010".to_string(), Decimal::from(800), Decimal::from(120))
            .with_display_name("Screw".to_string())
            .with_unit("pcs".to_string()),
    );

    // 檯燈：總量 150，與風扇共用螺絲
    directory.push_bom_row(
        lamp.clone(),
        Decimal::from(150),
        BomLine::new("S-010".to_string(), Decimal::from(300), Decimal::ZERO)
            .with_display_name("Screw".to_string())
            .with_unit("pcs".to_string()),
    );
    directory.push_bom_row(
        lamp.clone(),
        Decimal::from(150),
        BomLine::new("W-002".to_string(), Decimal::new(225, 1), Decimal::ZERO)
            .with_display_name("Cable".to_string())
            .with_unit("m".to_string()),
    );

    // 暖爐：已領完
    directory.push_bom_row(
        heater.clone(),
        Decimal::from(50),
        BomLine::new("H-001".to_string(), Decimal::from(50), Decimal::from(50))
            .with_display_name("Heating coil".to_string())
            .with_unit("pcs".to_string()),
    );

    for order in directory.iter() {
        println!("   ✓ {}: 總量 {}, 用料 {} 項", order.key, order.total_order_qty, order.bom_lines.len());
    }
    println!();

    // ========== 2. 庫存 ==========
    println!("📊 步驟 2: 當前庫存");
    let snapshot: InventorySnapshot = vec![
        ("M-100".to_string(), Decimal::from(150)),
        ("S-010".to_string(), Decimal::from(700)),
        ("W-002".to_string(), Decimal::from(12)),
        ("H-001".to_string(), Decimal::from(30)),
    ]
    .into_iter()
    .collect();
    let mut stock: Vec<_> = snapshot.iter().collect();
    stock.sort();
    for (component_id, qty) in stock {
        println!("   ✓ {}: {}", component_id, qty);
    }
    println!();

    // ========== 3. 排產計劃 ==========
    println!("📅 步驟 3: 排產計劃");
    let plan_lines = vec![
        PlanLine::new(date(2025, 11, 4)?, fan.clone(), 80).with_source_row(4),
        PlanLine::new(date(2025, 11, 4)?, lamp.clone(), 40).with_source_row(5),
        PlanLine::new(date(2025, 11, 4)?, heater.clone(), 10).with_source_row(6),
        PlanLine::new(date(2025, 11, 3)?, fan.clone(), 60).with_source_row(4),
        PlanLine::new(date(2025, 11, 5)?, lamp.clone(), 60).with_source_row(5),
        PlanLine::new(date(2025, 11, 5)?, WorkOrderKey::new("5101", "UNKNOWN"), 5)
            .with_source_row(7),
    ];
    for line in &plan_lines {
        println!(
            "   ✓ 第 {} 列 {} {}: {}",
            line.source_row, line.date, line.work_order_key, line.planned_quantity
        );
    }
    println!();

    // ========== 4. 計算 ==========
    println!("⚙️  步驟 4: 執行齊套計算");
    let calculator = KittingCalculator::new(KittingConfig::new().with_keep_final_state(true));
    let run = calculator.calculate(&plan_lines, &directory, &snapshot);
    println!();

    // ========== 5. 結果 ==========
    println!("📋 步驟 5: 逐列結果");
    for row in run.row_reports() {
        let marker = match row.status {
            KitStatus::Ok => "✅",
            KitStatus::Warn => "⚠️ ",
            KitStatus::Finished => "⏹️ ",
            KitStatus::Short | KitStatus::Error => "❌",
        };
        println!("{} 第 {} 列 [{}] 底色 {}", marker, row.source_row, row.status, row.status.fill_color());
        for message in &row.messages {
            println!("      {}", message);
        }
    }
    println!();

    let summary = run.summary();
    println!(
        "摘要: OK {} / WARN {} / SHORT {} / FINISHED {} / ERROR {}，計劃 {}，可產 {}",
        summary.ok,
        summary.warn,
        summary.short,
        summary.finished,
        summary.error,
        summary.total_planned,
        summary.total_achievable
    );

    if let Some(state) = &run.final_state {
        for (component_id, qty) in state.negative_components() {
            println!("   ⚠️  {} 期末庫存為負: {}", component_id, qty);
        }
    }

    Ok(())
}

fn date(year: i32, month: u32, day: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| anyhow::anyhow!("invalid date {}-{}-{}", year, month, day))
}
