//! # Stockplan Calculation Engine
//!
//! 庫存模擬與修正引擎

pub mod aggregator;
pub mod as_is;
pub mod batch_sizing;
pub mod export;
mod quantity;
pub mod repair;
pub mod report;

// Re-export 主要類型
pub use aggregator::{analyze_material, run_analysis, Aggregator};
pub use as_is::AsIsSimulator;
pub use batch_sizing::BatchSizer;
pub use export::ExportDocument;
pub use repair::{DeferredLedger, RepairEngine, RepairPlan};
pub use report::{sort_summaries, DashboardTotals, SortOrder, SummaryFilter, SummarySortKey};

use std::fmt;

use rust_decimal::Decimal;
use stockplan_core::{AlignedSeries, MaterialNumber, SimulationRow, SummaryRow, WeekIndex};
use uuid::Uuid;

/// 分析結果
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// 分析批次ID
    pub run_id: Uuid,

    /// 週軸
    pub weeks: WeekIndex,

    /// 各物料計劃（不含失敗的物料）
    pub plans: Vec<MaterialPlan>,

    /// 各物料彙總（含失敗的物料，依物料編號排序）
    pub summaries: Vec<SummaryRow>,

    /// 警告信息
    pub warnings: Vec<AnalysisWarning>,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl AnalysisReport {
    /// 創建空的分析結果
    pub fn empty(weeks: WeekIndex) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            weeks,
            plans: Vec::new(),
            summaries: Vec::new(),
            warnings: Vec::new(),
            calculation_time_ms: None,
        }
    }

    /// 添加警告
    pub fn add_warning(&mut self, warning: AnalysisWarning) {
        self.warnings.push(warning);
    }

    /// 查詢物料計劃
    pub fn plan_for(&self, material: MaterialNumber) -> Option<&MaterialPlan> {
        self.plans.iter().find(|p| p.material == material)
    }

    /// 查詢物料彙總
    pub fn summary_for(&self, material: MaterialNumber) -> Option<&SummaryRow> {
        self.summaries.iter().find(|s| s.material == material)
    }

    /// 與單一物料相關的警告
    pub fn warnings_for(
        &self,
        material: MaterialNumber,
    ) -> impl Iterator<Item = &AnalysisWarning> + '_ {
        self.warnings.iter().filter(move |w| w.material == Some(material))
    }

    /// 整批分析層級的警告（不屬於任何物料）
    pub fn run_warnings(&self) -> impl Iterator<Item = &AnalysisWarning> + '_ {
        self.warnings.iter().filter(|w| w.material.is_none())
    }
}

/// 分析警告
///
/// 訊息本身已含物料編號；`material` 用於依物料歸類。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisWarning {
    /// `None` 表示整批分析層級
    pub material: Option<MaterialNumber>,
    pub message: String,
    pub severity: WarningSeverity,
}

impl AnalysisWarning {
    pub fn new(material: Option<MaterialNumber>, message: String, severity: WarningSeverity) -> Self {
        Self {
            material,
            message,
            severity,
        }
    }

    pub fn info(material: Option<MaterialNumber>, message: String) -> Self {
        Self::new(material, message, WarningSeverity::Info)
    }

    pub fn warning(material: Option<MaterialNumber>, message: String) -> Self {
        Self::new(material, message, WarningSeverity::Warning)
    }

    pub fn error(material: Option<MaterialNumber>, message: String) -> Self {
        Self::new(material, message, WarningSeverity::Error)
    }
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WarningSeverity {
    Info,
    Warning,
    Error,
}

impl WarningSeverity {
    pub fn label(self) -> &'static str {
        match self {
            WarningSeverity::Info => "INFO",
            WarningSeverity::Warning => "WARN",
            WarningSeverity::Error => "ERROR",
        }
    }
}

impl fmt::Display for WarningSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 單物料分析結果
#[derive(Debug, Clone)]
pub struct MaterialPlan {
    pub material: MaterialNumber,

    /// 對齊後的週序列
    pub series: AlignedSeries,

    /// 期初庫存
    pub initial_stock: Decimal,

    /// 標準批量
    pub batch_size: Option<Decimal>,

    /// 現況計劃
    pub as_is: Vec<SimulationRow>,

    /// 修正後計劃
    pub to_be: RepairPlan,

    /// 彙總
    pub summary: SummaryRow,
}
