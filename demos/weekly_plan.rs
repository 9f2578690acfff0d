//! 週庫存計劃示範
//!
//! ```text
//! RUST_LOG=debug cargo run --example weekly_plan
//! ```

use anyhow::Context;
use stockplan::{
    logging, plan_from_tables, sort_summaries, DashboardTotals, ExportDocument, MaterialStatus,
    PlanConfig, RawTable, SortOrder, SummaryFilter, SummarySortKey,
};

const FORECAST: &str = "\
Materialnummer;Bezeichnung;KW 10/25;KW 11/25;KW 12/25;KW 13/25;KW 14/25;KW 15/25
1001;Schraube M8;120;80;90;100;110;95
1002;Mutter M8;10;10;10;10;10;10
1003;Scheibe 8;40;40;40;40;40;40
";

const LEDGER: &str = "\
numer indeksu;DocNum;Data dostawy;Zamówione;Potwierdzone;w magazynie
1001;;;;;150
1001;ZP/2025/0101;04-03-2025;250;0;150
1001;ZS/2025/0420;12-03-2025;0;30;150
1002;;;;;45
1002;ZP/2025/0102;03-03-2025;200;0;45
1003;;;;;80
1003;ZP/2025/0103;32-03-2025;100;0;80
";

fn main() -> anyhow::Result<()> {
    logging::init();

    let forecast = RawTable::from_semicolon_text(FORECAST).context("讀取需求預測")?;
    let ledger = RawTable::from_semicolon_text(LEDGER).context("讀取庫存帳")?;

    let config = PlanConfig::from_json_str(r#"{ "excess_window": 3 }"#)?;
    let run = plan_from_tables(&forecast, &ledger, &config)?;

    for issue in &run.issues {
        println!("匯入問題: {}", issue);
    }

    let report = &run.report;
    println!("分析批次 {}，耗時 {:?} ms", report.run_id, report.calculation_time_ms);

    let mut rows: Vec<_> = report.summaries.iter().collect();
    sort_summaries(&mut rows, SummarySortKey::Coverage, SortOrder::Ascending);

    println!("\n{:>8} {:>9} {:>10} {:>8} {:>10} {:>10}", "物料", "狀態", "覆蓋週數", "最低庫存", "需補充", "建議生產");
    for row in &rows {
        println!(
            "{:>8} {:>9} {:>10} {:>8} {:>10} {:>10}",
            row.material,
            row.status.label(),
            row.coverage,
            row.min_stock,
            row.required_replenishment,
            row.proposed_production
        );
    }

    for warning in report.run_warnings() {
        println!("{}", warning);
    }
    for row in rows.iter().filter(|row| row.is_error()) {
        for warning in report.warnings_for(row.material) {
            println!("{}", warning);
        }
    }

    let problems = SummaryFilter::new().with_statuses([MaterialStatus::Shortage, MaterialStatus::Excess]);
    let totals = DashboardTotals::from_rows(problems.apply(&report.summaries));
    println!(
        "\n需處理物料 {} 個（缺料 {}，過剩 {}）",
        totals.materials, totals.shortage, totals.excess
    );

    for plan in &report.plans {
        println!("\n物料 {} 修正後計劃：", plan.material);
        for row in &plan.to_be.rows {
            println!(
                "  {} ({}) 期初 {} 期末 {} {} {}",
                row.week,
                row.date_range_label(),
                row.stock_start,
                row.stock_end,
                row.status.label(),
                row.action_summary()
            );
        }
    }

    let json = ExportDocument::from_report(report).to_json()?;
    println!("\n匯出 JSON {} 位元組", json.len());

    Ok(())
}
