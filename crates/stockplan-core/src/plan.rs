//! 模擬結果模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::week::WeekKey;
use crate::MaterialNumber;

/// 週狀態分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeekStatus {
    /// 期末庫存不足以支應下週需求
    Shortage,
    /// 期末庫存超過未來數週需求緩衝
    Excess,
    /// 正常
    Normal,
}

impl WeekStatus {
    pub fn label(&self) -> &'static str {
        match self {
            WeekStatus::Shortage => "SHORTAGE",
            WeekStatus::Excess => "EXCESS",
            WeekStatus::Normal => "OK",
        }
    }
}

/// 延後供應的目標
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeferTarget {
    /// 延後到計劃時界內的某一週
    Week(WeekKey),
    /// 計劃時界內不需要，延後到時界之外
    BeyondHorizon,
}

impl fmt::Display for DeferTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeferTarget::Week(week) => write!(f, "{}", week),
            DeferTarget::BeyondHorizon => write!(f, "beyond horizon"),
        }
    }
}

/// 修正動作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepairAction {
    /// 本週下達生產訂單
    Production { quantity: Decimal },
    /// 本週原有供應延後到目標週
    Deferred {
        quantity: Decimal,
        target: DeferTarget,
    },
    /// 本週收到由前期延後的供應
    Received { quantity: Decimal },
}

impl fmt::Display for RepairAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepairAction::Production { quantity } => {
                write!(f, "PRODUCTION: +{}", format_quantity(*quantity))
            }
            RepairAction::Deferred { quantity, target } => {
                write!(f, "DEFERRED: {} to {}", format_quantity(*quantity), target)
            }
            RepairAction::Received { quantity } => {
                write!(f, "RECEIVED: {}", format_quantity(*quantity))
            }
        }
    }
}

/// 數量顯示（最多兩位小數，去除尾零）
pub fn format_quantity(quantity: Decimal) -> String {
    quantity.round_dp(2).normalize().to_string()
}

/// 單週模擬結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRow {
    /// 週次
    pub week: WeekKey,

    /// 期初庫存
    pub stock_start: Decimal,

    /// 本週實際供應（含延後收到、扣除延後送出）
    pub incoming: Decimal,

    /// 本週新增生產量（現況計劃恆為 0）
    pub production: Decimal,

    /// 本週消耗
    pub consumption: Decimal,

    /// 本週需求
    pub demand: Decimal,

    /// 期末庫存
    pub stock_end: Decimal,

    /// 下週需求（緩衝參考）
    pub next_week_demand: Decimal,

    /// 狀態分類
    pub status: WeekStatus,

    /// 修正動作（現況計劃為空）
    pub actions: Vec<RepairAction>,
}

impl SimulationRow {
    /// 是否缺料
    pub fn is_shortage(&self) -> bool {
        self.status == WeekStatus::Shortage
    }

    /// 動作摘要，多個動作以空白連接
    pub fn action_summary(&self) -> String {
        self.actions
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// 週次日期範圍
    pub fn date_range_label(&self) -> String {
        self.week.date_range_label()
    }
}

/// 庫存覆蓋週數
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Coverage {
    /// 可覆蓋的週數
    Weeks(Decimal),
    /// 平均需求為 0，覆蓋無限
    Unbounded,
}

impl Coverage {
    /// 計算覆蓋週數 = 庫存 / 平均週需求
    ///
    /// 商超出數量範圍時返回 `None`。
    pub fn from_stock(stock: Decimal, average_weekly_demand: Decimal) -> Option<Self> {
        if average_weekly_demand.is_zero() {
            Some(Coverage::Unbounded)
        } else {
            stock.checked_div(average_weekly_demand).map(Coverage::Weeks)
        }
    }

    /// 有限覆蓋週數
    pub fn weeks(&self) -> Option<Decimal> {
        match self {
            Coverage::Weeks(weeks) => Some(*weeks),
            Coverage::Unbounded => None,
        }
    }

    /// 是否落在區間內（上限為 `None` 表示不設上限）
    pub fn within(&self, min: Decimal, max: Option<Decimal>) -> bool {
        match (self, max) {
            (Coverage::Weeks(weeks), Some(max)) => *weeks >= min && *weeks <= max,
            (Coverage::Weeks(weeks), None) => *weeks >= min,
            (Coverage::Unbounded, Some(_)) => false,
            (Coverage::Unbounded, None) => true,
        }
    }
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coverage::Weeks(weeks) => write!(f, "{}", weeks.round_dp(1)),
            Coverage::Unbounded => write!(f, "∞"),
        }
    }
}

/// 物料整體狀態（缺料優先於過剩）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MaterialStatus {
    Shortage,
    Excess,
    Ok,
    /// 模擬失敗
    Error,
}

impl MaterialStatus {
    pub fn label(&self) -> &'static str {
        match self {
            MaterialStatus::Shortage => "SHORTAGE",
            MaterialStatus::Excess => "EXCESS",
            MaterialStatus::Ok => "OK",
            MaterialStatus::Error => "ERROR",
        }
    }
}

/// 物料彙總
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// 物料編號
    pub material: MaterialNumber,

    /// 期初庫存
    pub initial_stock: Decimal,

    /// 總需求
    pub total_demand: Decimal,

    /// 平均週需求
    pub average_weekly_demand: Decimal,

    /// 覆蓋週數
    pub coverage: Coverage,

    /// 時界內最低庫存
    pub min_stock: Decimal,

    /// 需補充量 = max(0, -最低庫存)
    pub required_replenishment: Decimal,

    /// 建議生產量（依標準批量取整）
    pub proposed_production: Decimal,

    /// 標準批量
    pub batch_size: Option<Decimal>,

    /// 第一個缺料週
    pub first_shortage_week: Option<WeekKey>,

    /// 缺料週數
    pub shortage_weeks: usize,

    /// 過剩週數
    pub excess_weeks: usize,

    /// 狀態
    pub status: MaterialStatus,

    /// 錯誤訊息（僅 `MaterialStatus::Error`）
    pub error: Option<String>,
}

impl SummaryRow {
    /// 模擬失敗的彙總列（指標歸零）
    pub fn failed(material: MaterialNumber, message: String) -> Self {
        Self {
            material,
            initial_stock: Decimal::ZERO,
            total_demand: Decimal::ZERO,
            average_weekly_demand: Decimal::ZERO,
            coverage: Coverage::Weeks(Decimal::ZERO),
            min_stock: Decimal::ZERO,
            required_replenishment: Decimal::ZERO,
            proposed_production: Decimal::ZERO,
            batch_size: None,
            first_shortage_week: None,
            shortage_weeks: 0,
            excess_weeks: 0,
            status: MaterialStatus::Error,
            error: Some(message),
        }
    }

    /// 是否模擬失敗
    pub fn is_error(&self) -> bool {
        self.status == MaterialStatus::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_display() {
        let week = WeekKey::new(2025, 9).unwrap();

        assert_eq!(
            RepairAction::Production { quantity: Decimal::from(50) }.to_string(),
            "PRODUCTION: +50"
        );
        assert_eq!(
            RepairAction::Deferred {
                quantity: Decimal::new(1005, 1),
                target: DeferTarget::Week(week),
            }
            .to_string(),
            "DEFERRED: 100.5 to 09.2025"
        );
        assert_eq!(
            RepairAction::Deferred {
                quantity: Decimal::from(100),
                target: DeferTarget::BeyondHorizon,
            }
            .to_string(),
            "DEFERRED: 100 to beyond horizon"
        );
        assert_eq!(
            RepairAction::Received { quantity: Decimal::from(30) }.to_string(),
            "RECEIVED: 30"
        );
    }

    #[test]
    fn test_action_summary_concatenates() {
        let row = SimulationRow {
            week: WeekKey::new(2025, 10).unwrap(),
            stock_start: Decimal::from(100),
            incoming: Decimal::from(40),
            production: Decimal::ZERO,
            consumption: Decimal::ZERO,
            demand: Decimal::from(10),
            stock_end: Decimal::from(130),
            next_week_demand: Decimal::from(10),
            status: WeekStatus::Normal,
            actions: vec![
                RepairAction::Deferred {
                    quantity: Decimal::from(60),
                    target: DeferTarget::BeyondHorizon,
                },
                RepairAction::Received { quantity: Decimal::from(40) },
            ],
        };

        assert_eq!(
            row.action_summary(),
            "DEFERRED: 60 to beyond horizon RECEIVED: 40"
        );
    }

    #[test]
    fn test_coverage() {
        assert_eq!(
            Coverage::from_stock(Decimal::from(100), Decimal::from(25)),
            Some(Coverage::Weeks(Decimal::from(4)))
        );
        assert_eq!(
            Coverage::from_stock(Decimal::from(100), Decimal::ZERO),
            Some(Coverage::Unbounded)
        );
        assert_eq!(Coverage::from_stock(Decimal::MAX, Decimal::new(1, 28)), None);

        let four = Coverage::Weeks(Decimal::from(4));
        assert!(four.within(Decimal::ZERO, Some(Decimal::from(10))));
        assert!(!four.within(Decimal::from(5), None));
        assert!(!Coverage::Unbounded.within(Decimal::ZERO, Some(Decimal::from(100))));
        assert!(Coverage::Unbounded.within(Decimal::ZERO, None));
        assert!(four < Coverage::Unbounded);
    }

    #[test]
    fn test_failed_summary_is_zeroed() {
        let row = SummaryRow::failed(42, "boom".to_string());

        assert!(row.is_error());
        assert_eq!(row.total_demand, Decimal::ZERO);
        assert_eq!(row.proposed_production, Decimal::ZERO);
        assert_eq!(row.error.as_deref(), Some("boom"));
    }
}
