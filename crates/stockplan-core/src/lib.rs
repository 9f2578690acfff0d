//! # Stockplan Core
//!
//! 核心資料模型與類型定義

pub mod config;
pub mod input;
pub mod plan;
pub mod series;
pub mod week;
pub mod week_index;

// Re-export 主要類型
pub use config::{BatchSizeStrategy, PlanConfig};
pub use input::{AnalysisInput, ForecastTable, LedgerTable};
pub use plan::{
    Coverage, DeferTarget, MaterialStatus, RepairAction, SimulationRow, SummaryRow, WeekStatus,
};
pub use series::{AlignedSeries, DocumentClass, IncomingRecord, MaterialLedger, MaterialSeries};
pub use week::{describe_label, WeekKey, UNKNOWN_WEEK_LABEL};
pub use week_index::WeekIndex;

/// 物料編號
pub type MaterialNumber = u64;

/// 計劃錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("找不到物料: {0}")]
    MaterialNotFound(MaterialNumber),

    #[error("物料 {material} 的週序列無效: {reason}")]
    InvalidSeries {
        material: MaterialNumber,
        reason: String,
    },

    #[error("無法解析週次標籤: {0}")]
    UnparseableWeekLabel(String),

    #[error("無效的週次: {year} 年第 {week} 週")]
    InvalidWeek { year: i32, week: u32 },

    #[error("無效的配置: {0}")]
    InvalidConfig(String),

    #[error("物料 {material} 模擬失敗: {reason}")]
    SimulationFailure {
        material: MaterialNumber,
        reason: String,
    },

    #[error("匯出錯誤: {0}")]
    Export(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;
