//! 集成測試

use chrono::NaiveDate;
use rstest::rstest;
use rust_decimal::Decimal;
use stockplan::*;
use stockplan_core::{DeferTarget, ForecastTable, IncomingRecord, LedgerTable, MaterialLedger, RepairAction};

fn week(w: u32) -> WeekKey {
    WeekKey::new(2025, w).unwrap()
}

fn dec(v: i64) -> Decimal {
    Decimal::from(v)
}

fn demand(values: &[i64]) -> Vec<(WeekKey, Decimal)> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (week(10 + i as u32), dec(*v)))
        .collect()
}

#[test]
fn test_simple_shortage_scenario() {
    logging::init_test();

    let input = AnalysisInput::new(
        ForecastTable::new().with_material(1, demand(&[50, 80, 0])),
        LedgerTable::new().with_ledger(MaterialLedger::new(1, dec(100))),
    );

    let plan = analyze_material(&input, 1, &PlanConfig::default()).unwrap();

    assert_eq!(plan.as_is.len(), 2);
    assert_eq!(plan.as_is[0].stock_end, dec(50));
    assert_eq!(plan.as_is[0].status, WeekStatus::Shortage);

    assert_eq!(plan.summary.status, MaterialStatus::Shortage);
    assert_eq!(plan.summary.first_shortage_week, Some(week(10)));
    assert_eq!(plan.summary.min_stock, dec(-30));
    assert_eq!(plan.summary.required_replenishment, dec(30));

    assert_eq!(
        plan.to_be.rows[0].actions,
        vec![RepairAction::Production { quantity: dec(30) }]
    );
}

#[test]
fn test_deferral_scenario() {
    logging::init_test();

    let receipt = IncomingRecord::new(
        "ZP/2025/1".to_string(),
        dec(100),
        Decimal::ZERO,
        NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
    );
    let input = AnalysisInput::new(
        ForecastTable::new().with_material(1, demand(&[10, 10, 10, 10, 10])),
        LedgerTable::new()
            .with_ledger(MaterialLedger::new(1, dec(200)).with_records(vec![receipt])),
    );

    let plan = analyze_material(&input, 1, &PlanConfig::default()).unwrap();

    assert_eq!(plan.as_is[0].stock_end, dec(290));
    assert_eq!(plan.as_is[0].status, WeekStatus::Excess);
    assert_eq!(plan.summary.status, MaterialStatus::Excess);

    assert_eq!(
        plan.to_be.rows[0].actions,
        vec![RepairAction::Deferred {
            quantity: dec(100),
            target: DeferTarget::BeyondHorizon,
        }]
    );
    assert_eq!(plan.to_be.beyond_horizon, dec(100));
    assert!(!plan.to_be.has_shortage());
    assert_eq!(plan.batch_size, Some(dec(100)));
}

const FORECAST: &str = "\
Materialnummer;Bezeichnung;KW 10/25;KW 11/25;KW 12/25;KW 13/25;KW 14/25
1001;Schraube;50;80;0;0;0
1002;Mutter;10;10;10;10;10
1003;Scheibe;-5;10;10;10;10
1004;Stift;10;10;10;10;10
";

const LEDGER: &str = "\
numer indeksu;DocNum;Data dostawy;Zamówione;Potwierdzone;w magazynie
1001;;;;;100
1002;ZP/2025/7;05-03-2025;100;0;200
1003;;;;;40
1004;ZP/2025/9;not-a-date;500;0;15
1004;ZS/2025/3;12-03-2025;0;5;15
9999;;;;;1
";

#[rstest]
#[case::parallel(true)]
#[case::sequential(false)]
fn test_pipeline_isolates_failures(#[case] parallel: bool) {
    logging::init_test();

    let forecast = RawTable::from_semicolon_text(FORECAST).unwrap();
    let ledger = RawTable::from_semicolon_text(LEDGER).unwrap();
    let config = PlanConfig::default().with_parallel(parallel);

    let run = plan_from_tables(&forecast, &ledger, &config).unwrap();
    let report = &run.report;

    // 表頭 Bezeichnung 與壞日期都只是非致命問題
    assert!(run
        .issues
        .contains(&IngestError::UnparseableWeekLabel("Bezeichnung".to_string())));
    assert!(run.issues.contains(&IngestError::UnparseableDate {
        row: 5,
        value: "not-a-date".to_string(),
    }));

    assert_eq!(report.weeks.len(), 5);
    assert_eq!(report.summaries.len(), 4);

    // 負數需求只讓該物料失敗
    let broken = report.summary_for(1003).unwrap();
    assert!(broken.is_error());
    let warnings: Vec<_> = report.warnings_for(1003).collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].severity, WarningSeverity::Error);
    assert!(warnings[0].to_string().starts_with("[ERROR] 物料 1003"));

    let shortage = report.summary_for(1001).unwrap();
    assert_eq!(shortage.status, MaterialStatus::Shortage);
    assert_eq!(shortage.required_replenishment, dec(30));

    let excess = report.summary_for(1002).unwrap();
    assert_eq!(excess.status, MaterialStatus::Excess);

    // 壞日期的入庫被排除，只剩消耗單據
    let pin = report.plan_for(1004).unwrap();
    assert_eq!(pin.batch_size, None);
    assert_eq!(pin.series.incoming, vec![Decimal::ZERO; 5]);
    assert_eq!(pin.series.consumption[1], dec(5));
    assert_eq!(pin.summary.status, MaterialStatus::Shortage);

    // 只在庫存帳中的物料不出現在彙總
    assert!(report.summary_for(9999).is_none());
    assert_eq!(report.warnings_for(9999).next().unwrap().severity, WarningSeverity::Info);
}

const HUGE: &str = "79228162514264337593543950335";

#[rstest]
#[case::overflowing_demand(
    format!("Materialnummer;KW 10/25;KW 11/25;KW 12/25\n1;{HUGE};{HUGE};0\n2;10;10;10\n"),
    "numer indeksu;DocNum;Data dostawy;Zamówione;Potwierdzone;w magazynie\n1;;;;;0\n2;;;;;50\n"
        .to_string(),
)]
#[case::overflowing_receipts(
    "Materialnummer;KW 10/25;KW 11/25;KW 12/25\n1;10;10;10\n2;10;10;10\n".to_string(),
    format!(
        "numer indeksu;DocNum;Data dostawy;Zamówione;Potwierdzone;w magazynie\n\
         1;ZP/1;03.03.25;{HUGE};0;{HUGE}\n2;;;;;50\n"
    ),
)]
fn test_unrepresentable_quantities_fail_one_material(
    #[case] forecast: String,
    #[case] ledger: String,
) {
    logging::init_test();

    let forecast = RawTable::from_semicolon_text(&forecast).unwrap();
    let ledger = RawTable::from_semicolon_text(&ledger).unwrap();
    let report = plan_from_tables(&forecast, &ledger, &PlanConfig::default()).unwrap().report;

    let broken = report.summary_for(1).unwrap();
    assert!(broken.is_error());
    assert!(broken.error.as_deref().unwrap().contains("超出數量範圍"));

    let healthy = report.summary_for(2).unwrap();
    assert_eq!(healthy.status, MaterialStatus::Ok);
    assert_eq!(report.plans.len(), 1);
}

#[test]
fn test_dashboard_and_export() {
    let forecast = RawTable::from_semicolon_text(FORECAST).unwrap();
    let ledger = RawTable::from_semicolon_text(LEDGER).unwrap();
    let config = PlanConfig::default().with_parallel(false);
    let report = plan_from_tables(&forecast, &ledger, &config).unwrap().report;

    let filter = SummaryFilter::new().with_statuses([MaterialStatus::Shortage]);
    let mut shortages = filter.apply(&report.summaries);
    sort_summaries(&mut shortages, SummarySortKey::Material, SortOrder::Descending);
    let materials: Vec<_> = shortages.iter().map(|r| r.material).collect();
    assert_eq!(materials, vec![1004, 1001]);

    let totals = DashboardTotals::from_rows(&report.summaries);
    assert_eq!(totals.materials, 4);
    assert_eq!(totals.errors, 1);
    assert_eq!(totals.shortage, 2);
    assert_eq!(totals.excess, 1);

    let json = ExportDocument::from_report(&report).to_json().unwrap();
    assert!(json.contains("DEFERRED: 100 to beyond horizon"));
    assert!(json.contains("PRODUCTION: +30"));
}

#[test]
fn test_missing_column_fails_whole_table() {
    let forecast = RawTable::from_semicolon_text(FORECAST).unwrap();
    let ledger = RawTable::from_semicolon_text("numer indeksu;DocNum\n1;ZP/1\n").unwrap();

    let err = plan_from_tables(&forecast, &ledger, &PlanConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        StockplanError::Ingest(IngestError::MissingColumn { table: "ledger", .. })
    ));
}
