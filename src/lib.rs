//! # Stockplan
//!
//! 週庫存模擬與修正：由需求預測與庫存帳產生現況計劃、
//! 修正後計劃與跨物料彙總。

pub mod logging;

pub use stockplan_calc::{
    analyze_material, run_analysis, sort_summaries, Aggregator, AnalysisReport, AnalysisWarning,
    DashboardTotals, ExportDocument, MaterialPlan, RepairPlan, SortOrder, SummaryFilter,
    SummarySortKey, WarningSeverity,
};
pub use stockplan_core::{
    AnalysisInput, BatchSizeStrategy, Coverage, MaterialNumber, MaterialStatus, PlanConfig,
    PlanError, SimulationRow, SummaryRow, WeekIndex, WeekKey, WeekStatus,
};
pub use stockplan_ingest::{IngestError, RawTable};

use stockplan_ingest::{normalize_forecast, normalize_ledger};

/// 整體流程錯誤
#[derive(Debug, thiserror::Error)]
pub enum StockplanError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Plan(#[from] PlanError),
}

pub type Result<T> = std::result::Result<T, StockplanError>;

/// 由原始表格完成一次分析的結果
#[derive(Debug, Clone)]
pub struct PlanRun {
    pub report: AnalysisReport,

    /// 匯入時的非致命問題
    pub issues: Vec<IngestError>,
}

/// 原始表格 → 正規化 → 分析
pub fn plan_from_tables(
    forecast: &RawTable,
    ledger: &RawTable,
    config: &PlanConfig,
) -> Result<PlanRun> {
    let forecast = normalize_forecast(forecast)?;
    let ledger = normalize_ledger(ledger)?;

    let mut issues = forecast.issues;
    issues.extend(ledger.issues);
    if !issues.is_empty() {
        tracing::warn!("匯入時有 {} 個非致命問題", issues.len());
    }

    let input = AnalysisInput::new(forecast.forecast, ledger.ledgers);
    let report = run_analysis(&input, config)?;

    Ok(PlanRun { report, issues })
}
