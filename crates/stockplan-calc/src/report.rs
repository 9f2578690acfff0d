//! 彙總表篩選、排序與總覽指標

use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use stockplan_core::{MaterialStatus, SummaryRow};

/// 彙總表篩選條件
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryFilter {
    /// 允許的狀態（`None` 表示不限）
    pub statuses: Option<BTreeSet<MaterialStatus>>,

    /// 覆蓋週數下限
    pub min_coverage: Decimal,

    /// 覆蓋週數上限（`None` 表示不設上限）
    pub max_coverage: Option<Decimal>,
}

impl SummaryFilter {
    /// 不做任何篩選
    pub fn new() -> Self {
        Self {
            statuses: None,
            min_coverage: Decimal::ZERO,
            max_coverage: None,
        }
    }

    /// 建構器模式：限定狀態
    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = MaterialStatus>) -> Self {
        self.statuses = Some(statuses.into_iter().collect());
        self
    }

    /// 建構器模式：限定覆蓋週數區間
    pub fn with_coverage_range(mut self, min: Decimal, max: Option<Decimal>) -> Self {
        self.min_coverage = min;
        self.max_coverage = max;
        self
    }

    pub fn matches(&self, row: &SummaryRow) -> bool {
        if let Some(statuses) = &self.statuses {
            if !statuses.contains(&row.status) {
                return false;
            }
        }
        row.coverage.within(self.min_coverage, self.max_coverage)
    }

    /// 套用篩選（保持原順序）
    pub fn apply<'a>(&self, rows: &'a [SummaryRow]) -> Vec<&'a SummaryRow> {
        rows.iter().filter(|row| self.matches(row)).collect()
    }
}

impl Default for SummaryFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// 排序欄位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarySortKey {
    Material,
    InitialStock,
    TotalDemand,
    AverageDemand,
    Coverage,
    MinStock,
    RequiredReplenishment,
    ProposedProduction,
    Status,
    FirstShortageWeek,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// 排序彙總表
///
/// 相同值以物料編號遞增排列。遞增排序時沒有缺料週的物料排在最後。
pub fn sort_summaries(rows: &mut [&SummaryRow], key: SummarySortKey, order: SortOrder) {
    rows.sort_by(|a, b| {
        let primary = compare_by(a, b, key);
        let primary = match order {
            SortOrder::Ascending => primary,
            SortOrder::Descending => primary.reverse(),
        };
        primary.then_with(|| a.material.cmp(&b.material))
    });
}

fn compare_by(a: &SummaryRow, b: &SummaryRow, key: SummarySortKey) -> Ordering {
    match key {
        SummarySortKey::Material => a.material.cmp(&b.material),
        SummarySortKey::InitialStock => a.initial_stock.cmp(&b.initial_stock),
        SummarySortKey::TotalDemand => a.total_demand.cmp(&b.total_demand),
        SummarySortKey::AverageDemand => a.average_weekly_demand.cmp(&b.average_weekly_demand),
        SummarySortKey::Coverage => a.coverage.cmp(&b.coverage),
        SummarySortKey::MinStock => a.min_stock.cmp(&b.min_stock),
        SummarySortKey::RequiredReplenishment => {
            a.required_replenishment.cmp(&b.required_replenishment)
        }
        SummarySortKey::ProposedProduction => a.proposed_production.cmp(&b.proposed_production),
        SummarySortKey::Status => a.status.cmp(&b.status),
        SummarySortKey::FirstShortageWeek => match (a.first_shortage_week, b.first_shortage_week) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

/// 總覽指標
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardTotals {
    pub materials: usize,
    pub ok: usize,
    pub shortage: usize,
    pub excess: usize,
    pub errors: usize,
    pub total_stock: Decimal,
    pub total_demand: Decimal,
    pub total_proposed_production: Decimal,

    /// 有限覆蓋週數的平均值
    pub average_coverage: Option<Decimal>,
}

impl DashboardTotals {
    /// 由（篩選後的）彙總列計算
    ///
    /// 跨物料加總超出數量範圍時停在上限。
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a SummaryRow>) -> Self {
        let mut totals = Self::default();
        let mut coverage_sum = Decimal::ZERO;
        let mut coverage_count = 0usize;

        for row in rows {
            totals.materials += 1;
            match row.status {
                MaterialStatus::Ok => totals.ok += 1,
                MaterialStatus::Shortage => totals.shortage += 1,
                MaterialStatus::Excess => totals.excess += 1,
                MaterialStatus::Error => {
                    totals.errors += 1;
                    continue;
                }
            }

            totals.total_stock = totals.total_stock.saturating_add(row.initial_stock);
            totals.total_demand = totals.total_demand.saturating_add(row.total_demand);
            totals.total_proposed_production = totals
                .total_proposed_production
                .saturating_add(row.proposed_production);

            if let Some(weeks) = row.coverage.weeks() {
                coverage_sum = coverage_sum.saturating_add(weeks);
                coverage_count += 1;
            }
        }

        if coverage_count > 0 {
            totals.average_coverage = Some(coverage_sum / Decimal::from(coverage_count));
        }

        totals
    }
}
