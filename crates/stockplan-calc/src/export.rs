//! 分析結果匯出

use rust_decimal::Decimal;
use serde::Serialize;
use stockplan_core::{MaterialNumber, PlanError, Result, SimulationRow, SummaryRow, WeekKey};

use crate::{AnalysisReport, AnalysisWarning, MaterialPlan};

/// 匯出文件：彙總表加上每個物料的明細
#[derive(Debug, Clone, Serialize)]
pub struct ExportDocument {
    pub run_id: String,
    pub weeks: Vec<WeekKey>,
    pub summary: Vec<SummaryRecord>,
    pub details: Vec<MaterialDetail>,
    pub warnings: Vec<WarningRecord>,
}

/// 警告列
#[derive(Debug, Clone, Serialize)]
pub struct WarningRecord {
    pub material: Option<MaterialNumber>,
    pub severity: &'static str,
    pub message: String,
}

impl From<&AnalysisWarning> for WarningRecord {
    fn from(warning: &AnalysisWarning) -> Self {
        Self {
            material: warning.material,
            severity: warning.severity.label(),
            message: warning.message.clone(),
        }
    }
}

/// 彙總列
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRecord {
    pub material: MaterialNumber,
    pub status: &'static str,
    pub initial_stock: Decimal,
    pub total_demand: Decimal,
    pub average_weekly_demand: Decimal,
    pub coverage: String,
    pub min_stock: Decimal,
    pub required_replenishment: Decimal,
    pub proposed_production: Decimal,
    pub batch_size: Option<Decimal>,
    pub first_shortage_week: Option<WeekKey>,
    pub error: Option<String>,
}

impl From<&SummaryRow> for SummaryRecord {
    fn from(row: &SummaryRow) -> Self {
        Self {
            material: row.material,
            status: row.status.label(),
            initial_stock: row.initial_stock,
            total_demand: row.total_demand,
            average_weekly_demand: row.average_weekly_demand,
            coverage: row.coverage.to_string(),
            min_stock: row.min_stock,
            required_replenishment: row.required_replenishment,
            proposed_production: row.proposed_production,
            batch_size: row.batch_size,
            first_shortage_week: row.first_shortage_week,
            error: row.error.clone(),
        }
    }
}

/// 單物料明細
#[derive(Debug, Clone, Serialize)]
pub struct MaterialDetail {
    pub material: MaterialNumber,
    pub as_is: Vec<DetailRecord>,
    pub to_be: Vec<DetailRecord>,
    pub deferred_beyond_horizon: Decimal,
}

impl From<&MaterialPlan> for MaterialDetail {
    fn from(plan: &MaterialPlan) -> Self {
        Self {
            material: plan.material,
            as_is: plan.as_is.iter().map(DetailRecord::from).collect(),
            to_be: plan.to_be.rows.iter().map(DetailRecord::from).collect(),
            deferred_beyond_horizon: plan.to_be.beyond_horizon,
        }
    }
}

/// 明細列
#[derive(Debug, Clone, Serialize)]
pub struct DetailRecord {
    pub week: WeekKey,
    pub date_range: String,
    pub stock_start: Decimal,
    pub incoming: Decimal,
    pub production: Decimal,
    pub consumption: Decimal,
    pub demand: Decimal,
    pub stock_end: Decimal,
    pub next_week_demand: Decimal,
    pub status: &'static str,
    pub action: String,
}

impl From<&SimulationRow> for DetailRecord {
    fn from(row: &SimulationRow) -> Self {
        Self {
            week: row.week,
            date_range: row.date_range_label(),
            stock_start: row.stock_start,
            incoming: row.incoming,
            production: row.production,
            consumption: row.consumption,
            demand: row.demand,
            stock_end: row.stock_end,
            next_week_demand: row.next_week_demand,
            status: row.status.label(),
            action: row.action_summary(),
        }
    }
}

impl ExportDocument {
    pub fn from_report(report: &AnalysisReport) -> Self {
        Self {
            run_id: report.run_id.to_string(),
            weeks: report.weeks.weeks().to_vec(),
            summary: report.summaries.iter().map(SummaryRecord::from).collect(),
            details: report.plans.iter().map(MaterialDetail::from).collect(),
            warnings: report.warnings.iter().map(WarningRecord::from).collect(),
        }
    }

    /// 序列化為 JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| PlanError::Export(e.to_string()))
    }
}
