//! 現況庫存模擬

use rust_decimal::Decimal;
use stockplan_core::{AlignedSeries, PlanConfig, PlanError, Result, SimulationRow, WeekStatus};

use crate::quantity;

/// 現況模擬器
///
/// 不做任何修正，逐週推算期末庫存並分類。
pub struct AsIsSimulator;

impl AsIsSimulator {
    /// 模擬現況計劃
    ///
    /// 週軸長度為 N 時輸出 N-1 週，最後一週只作為下週需求參考。
    pub fn simulate(
        initial_stock: Decimal,
        series: &AlignedSeries,
        config: &PlanConfig,
    ) -> Result<Vec<SimulationRow>> {
        validate_inputs(initial_stock, series)?;

        let n = series.len();
        let mut rows = Vec::with_capacity(n.saturating_sub(1));
        let mut stock = initial_stock;

        for i in 0..n.saturating_sub(1) {
            let stock_start = stock;
            let incoming = series.incoming[i];
            let consumption = series.consumption[i];
            let demand = series.demand[i];
            let stock_end =
                quantity::week_end(series.material, stock_start, incoming, demand, consumption)?;

            let status = classify(stock_end, i, &series.demand, incoming, config.excess_window);

            rows.push(SimulationRow {
                week: series.weeks[i],
                stock_start,
                incoming,
                production: Decimal::ZERO,
                consumption,
                demand,
                stock_end,
                next_week_demand: series.demand[i + 1],
                status,
                actions: Vec::new(),
            });

            stock = stock_end;
        }

        tracing::debug!(
            "物料 {} 現況模擬完成：{} 週，缺料 {} 週",
            series.material,
            rows.len(),
            rows.iter().filter(|r| r.is_shortage()).count()
        );

        Ok(rows)
    }
}

/// 檢查期初庫存與序列
///
/// 各序列總和必須可表示，之後任何區段和都不會溢位。
pub(crate) fn validate_inputs(initial_stock: Decimal, series: &AlignedSeries) -> Result<()> {
    series.validate()?;
    if initial_stock < Decimal::ZERO {
        return Err(PlanError::InvalidSeries {
            material: series.material,
            reason: format!("期初庫存為負數: {}", initial_stock),
        });
    }

    quantity::total(series.material, &series.demand, "需求總和")?;
    quantity::total(series.material, &series.incoming, "供應總和")?;
    quantity::total(series.material, &series.consumption, "消耗總和")?;
    Ok(())
}

/// 未來 `window` 週（i+1..=i+window）的需求總和，溢位時返回 `None`
pub fn forward_buffer(demand: &[Decimal], i: usize, window: usize) -> Option<Decimal> {
    demand[i + 1..=i + window]
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
}

/// 週狀態分類
///
/// 缺料優先；過剩只在前瞻窗口完整且本週有收入時判斷。
pub fn classify(
    stock_end: Decimal,
    i: usize,
    demand: &[Decimal],
    income: Decimal,
    window: usize,
) -> WeekStatus {
    if stock_end < demand[i + 1] {
        WeekStatus::Shortage
    } else if i + window < demand.len()
        && income > Decimal::ZERO
        && forward_buffer(demand, i, window).is_some_and(|buffer| stock_end > buffer)
    {
        WeekStatus::Excess
    } else {
        WeekStatus::Normal
    }
}
