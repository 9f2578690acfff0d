//! 修正計劃引擎
//!
//! 單次由左到右掃描：缺料時下達生產訂單（依標準批量取整），
//! 過剩時將本週原有供應延後到第一個會缺料的未來週。

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use stockplan_core::{
    AlignedSeries, DeferTarget, PlanConfig, RepairAction, Result, SimulationRow, WeekKey,
};

use crate::as_is::{classify, forward_buffer, validate_inputs};
use crate::quantity;

/// 延後供應帳：目標週 → 延後數量
///
/// 只存在於單一物料的一次修正計算中。
#[derive(Debug, Clone, Default)]
pub struct DeferredLedger {
    entries: BTreeMap<DeferTarget, Decimal>,
}

impl DeferredLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登記延後數量
    pub fn defer(&mut self, target: DeferTarget, quantity: Decimal) {
        *self.entries.entry(target).or_insert(Decimal::ZERO) += quantity;
    }

    /// 取出某週應收到的延後數量（取出後清除）
    pub fn take(&mut self, week: WeekKey) -> Decimal {
        self.entries
            .remove(&DeferTarget::Week(week))
            .unwrap_or(Decimal::ZERO)
    }

    /// 查看某週待收的延後數量
    pub fn pending(&self, week: WeekKey) -> Decimal {
        self.entries
            .get(&DeferTarget::Week(week))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// 延後到時界之外的數量
    pub fn beyond_horizon(&self) -> Decimal {
        self.entries
            .get(&DeferTarget::BeyondHorizon)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

/// 修正後計劃
#[derive(Debug, Clone, PartialEq)]
pub struct RepairPlan {
    /// 逐週結果
    pub rows: Vec<SimulationRow>,

    /// 延後到時界之外的供應量
    pub beyond_horizon: Decimal,

    /// 總生產量
    pub total_production: Decimal,
}

impl RepairPlan {
    /// 生產訂單（週, 數量）
    pub fn production_orders(&self) -> impl Iterator<Item = (WeekKey, Decimal)> + '_ {
        self.rows
            .iter()
            .filter(|r| r.production > Decimal::ZERO)
            .map(|r| (r.week, r.production))
    }

    /// 延後動作次數
    pub fn deferral_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|r| r.actions.iter())
            .filter(|a| matches!(a, RepairAction::Deferred { .. }))
            .count()
    }

    /// 是否仍有缺料週
    pub fn has_shortage(&self) -> bool {
        self.rows.iter().any(|r| r.is_shortage())
    }
}

/// 修正引擎
pub struct RepairEngine;

impl RepairEngine {
    /// 產生修正後計劃
    pub fn repair(
        initial_stock: Decimal,
        series: &AlignedSeries,
        batch_size: Option<Decimal>,
        config: &PlanConfig,
    ) -> Result<RepairPlan> {
        validate_inputs(initial_stock, series)?;

        let n = series.len();
        let window = config.excess_window;
        let mut ledger = DeferredLedger::new();
        let mut rows = Vec::with_capacity(n.saturating_sub(1));
        let mut stock = initial_stock;

        let material = series.material;
        let mut total_production = Decimal::ZERO;

        for i in 0..n.saturating_sub(1) {
            let week = series.weeks[i];
            let scheduled_income = series.incoming[i];
            let demand = series.demand[i];
            let consumption = series.consumption[i];
            let next_demand = series.demand[i + 1];

            let deferred_in = ledger.take(week);
            let mut effective_income =
                quantity::add(material, scheduled_income, deferred_in, "本週收入")?;

            let stock_start = stock;
            let stock_after =
                quantity::week_end(material, stock_start, effective_income, demand, consumption)?;

            let mut actions = Vec::new();
            let mut production = Decimal::ZERO;

            if stock_after < next_demand {
                let deficit = quantity::sub(material, next_demand, stock_after, "缺口")?;
                production = quantize_order(deficit, batch_size)
                    .ok_or_else(|| quantity::overflow(material, "生產量"))?;
                actions.push(RepairAction::Production { quantity: production });
                stock = quantity::add(material, stock_after, production, "期末庫存")?;
                total_production =
                    quantity::add(material, total_production, production, "總生產量")?;
            } else if i + window < n && scheduled_income > Decimal::ZERO {
                let without_income =
                    quantity::sub(material, stock_after, scheduled_income, "期末庫存")?;
                let above_buffer = forward_buffer(&series.demand, i, window)
                    .is_some_and(|buffer| stock_after > buffer);

                if above_buffer && without_income >= next_demand {
                    let target = find_defer_target(series, i, without_income, &ledger)?;
                    ledger.defer(target, scheduled_income);
                    actions.push(RepairAction::Deferred {
                        quantity: scheduled_income,
                        target,
                    });

                    tracing::debug!(
                        "物料 {} 第 {} 週供應 {} 延後至 {}",
                        material,
                        week,
                        scheduled_income,
                        target
                    );

                    effective_income = deferred_in;
                    stock = without_income;
                } else {
                    stock = stock_after;
                }
            } else {
                stock = stock_after;
            }

            if deferred_in > Decimal::ZERO {
                actions.push(RepairAction::Received { quantity: deferred_in });
            }

            let status = classify(stock, i, &series.demand, effective_income, window);

            rows.push(SimulationRow {
                week,
                stock_start,
                incoming: effective_income,
                production,
                consumption,
                demand,
                stock_end: stock,
                next_week_demand: next_demand,
                status,
                actions,
            });
        }

        let plan = RepairPlan {
            rows,
            beyond_horizon: ledger.beyond_horizon(),
            total_production,
        };

        tracing::debug!(
            "物料 {} 修正計劃完成：生產 {}，延後 {} 次",
            material,
            plan.total_production,
            plan.deferral_count()
        );

        Ok(plan)
    }
}

/// 生產量取整
///
/// 有正的標準批量時向上取整為批量倍數，否則照缺口下單。
/// 結果超出數量範圍時返回 `None`。
pub fn quantize_order(deficit: Decimal, batch_size: Option<Decimal>) -> Option<Decimal> {
    match batch_size {
        Some(batch) if batch > Decimal::ZERO => {
            deficit.checked_div(batch)?.ceil().checked_mul(batch)
        }
        _ => Some(deficit),
    }
}

/// 尋找延後目標週
///
/// 從 i+1 週開始推算庫存（含帳上已登記的延後量），
/// 第一個期末庫存低於下週需求的週即為目標。
fn find_defer_target(
    series: &AlignedSeries,
    i: usize,
    start_stock: Decimal,
    ledger: &DeferredLedger,
) -> Result<DeferTarget> {
    let n = series.len();
    let mut projected = start_stock;

    for k in (i + 1)..(n - 1) {
        let week = series.weeks[k];
        let income = quantity::add(
            series.material,
            series.incoming[k],
            ledger.pending(week),
            "推算收入",
        )?;
        projected = quantity::week_end(
            series.material,
            projected,
            income,
            series.demand[k],
            series.consumption[k],
        )?;

        if projected < series.demand[k + 1] {
            return Ok(DeferTarget::Week(week));
        }
    }

    Ok(DeferTarget::BeyondHorizon)
}
