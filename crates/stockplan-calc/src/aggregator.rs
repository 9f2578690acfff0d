//! 跨物料彙總計算器

use rayon::prelude::*;
use rust_decimal::Decimal;
use stockplan_core::{
    AlignedSeries, AnalysisInput, Coverage, MaterialNumber, MaterialSeries, MaterialStatus,
    PlanConfig, PlanError, Result, SimulationRow, SummaryRow, WeekIndex, WeekStatus,
};

use crate::as_is::AsIsSimulator;
use crate::batch_sizing::BatchSizer;
use crate::quantity;
use crate::repair::{quantize_order, RepairEngine};
use crate::{AnalysisReport, AnalysisWarning, MaterialPlan};

/// 彙總計算器
pub struct Aggregator {
    /// 計劃參數
    config: PlanConfig,
}

impl Aggregator {
    /// 創建新的彙總計算器
    pub fn new(config: PlanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// 主計算入口
    ///
    /// 單一物料失敗只產生錯誤列，不影響其他物料。
    pub fn run(&self, input: &AnalysisInput) -> Result<AnalysisReport> {
        self.config.validate()?;

        tracing::info!(
            "開始庫存分析：預測物料 {} 個，庫存帳 {} 個",
            input.forecast.len(),
            input.ledgers.len()
        );

        let start_time = std::time::Instant::now();

        // Step 1: 建立週軸
        tracing::debug!("Step 1: 建立週軸");
        let weeks = WeekIndex::from_forecast(&input.forecast);
        tracing::debug!("週數: {}", weeks.len());

        let mut report = AnalysisReport::empty(weeks);

        if report.weeks.len() < 2 {
            report.add_warning(AnalysisWarning::warning(
                None,
                format!("週軸只有 {} 週，無法模擬", report.weeks.len()),
            ));
        }

        // Step 2: 檢查物料對應
        tracing::debug!("Step 2: 物料對應");
        for material in input.ledger_only() {
            report.add_warning(AnalysisWarning::info(
                Some(material),
                format!("物料 {} 不在需求預測中，略過", material),
            ));
        }

        // Step 3: 逐物料計算
        tracing::debug!("Step 3: 逐物料計算（並行: {}）", self.config.parallel);
        let materials: Vec<MaterialNumber> = input.forecast.materials().collect();
        let outcomes: Vec<(MaterialNumber, Result<MaterialPlan>)> = if self.config.parallel {
            materials
                .par_iter()
                .map(|&material| (material, self.plan_material(input, &report.weeks, material)))
                .collect()
        } else {
            materials
                .iter()
                .map(|&material| (material, self.plan_material(input, &report.weeks, material)))
                .collect()
        };

        // Step 4: 收集結果
        tracing::debug!("Step 4: 收集結果");
        for (material, outcome) in outcomes {
            match outcome {
                Ok(plan) => {
                    report.summaries.push(plan.summary.clone());
                    report.plans.push(plan);
                }
                Err(e) => {
                    tracing::warn!("物料 {} 計算失敗: {}", material, e);
                    report.add_warning(AnalysisWarning::error(Some(material), e.to_string()));
                    report.summaries.push(SummaryRow::failed(material, e.to_string()));
                }
            }
        }

        let elapsed = start_time.elapsed();
        report.calculation_time_ms = Some(elapsed.as_millis());

        tracing::info!(
            "庫存分析完成：物料 {} 個，失敗 {} 個，耗時 {:?}",
            report.summaries.len(),
            report.summaries.iter().filter(|s| s.is_error()).count(),
            elapsed
        );

        Ok(report)
    }

    /// 計算單一物料
    pub fn plan_material(
        &self,
        input: &AnalysisInput,
        weeks: &WeekIndex,
        material: MaterialNumber,
    ) -> Result<MaterialPlan> {
        tracing::debug!("計算物料: {}", material);

        let demand = input
            .forecast
            .demand_for(material)
            .ok_or(PlanError::MaterialNotFound(material))?;
        let ledger = input
            .ledgers
            .get(material)
            .ok_or(PlanError::MaterialNotFound(material))?;

        if weeks.len() < 2 {
            return Err(PlanError::SimulationFailure {
                material,
                reason: format!("週軸只有 {} 週，至少需要 2 週", weeks.len()),
            });
        }

        let batch_size = BatchSizer::derive(ledger, &self.config);
        let series = MaterialSeries::from_ledger(ledger, demand.clone())?;
        let aligned = series.align(weeks.weeks());

        let as_is = AsIsSimulator::simulate(series.initial_stock, &aligned, &self.config)?;
        let to_be = RepairEngine::repair(series.initial_stock, &aligned, batch_size, &self.config)?;
        let summary = summarize(&aligned, series.initial_stock, &as_is, batch_size)?;

        Ok(MaterialPlan {
            material,
            series: aligned,
            initial_stock: series.initial_stock,
            batch_size,
            as_is,
            to_be,
            summary,
        })
    }
}

/// 執行完整分析
pub fn run_analysis(input: &AnalysisInput, config: &PlanConfig) -> Result<AnalysisReport> {
    Aggregator::new(config.clone()).run(input)
}

/// 分析單一物料（週軸取自整個需求預測表）
pub fn analyze_material(
    input: &AnalysisInput,
    material: MaterialNumber,
    config: &PlanConfig,
) -> Result<MaterialPlan> {
    config.validate()?;
    let weeks = WeekIndex::from_forecast(&input.forecast);
    Aggregator::new(config.clone()).plan_material(input, &weeks, material)
}

/// 由現況計劃產生物料彙總
///
/// 彙總數值超出數量範圍時返回 `SimulationFailure`。
pub fn summarize(
    series: &AlignedSeries,
    initial_stock: Decimal,
    as_is: &[SimulationRow],
    batch_size: Option<Decimal>,
) -> Result<SummaryRow> {
    let material = series.material;
    let total_demand = quantity::total(material, &series.demand, "需求總和")?;
    let average_weekly_demand = if series.is_empty() {
        Decimal::ZERO
    } else {
        total_demand / Decimal::from(series.len())
    };

    let min_stock = as_is
        .iter()
        .map(|r| r.stock_end)
        .min()
        .unwrap_or(initial_stock);
    let required_replenishment = (-min_stock).max(Decimal::ZERO);
    let proposed_production = if required_replenishment > Decimal::ZERO {
        quantize_order(required_replenishment, batch_size)
            .ok_or_else(|| quantity::overflow(material, "建議生產量"))?
    } else {
        Decimal::ZERO
    };
    let coverage = Coverage::from_stock(initial_stock, average_weekly_demand)
        .ok_or_else(|| quantity::overflow(material, "覆蓋週數"))?;

    let shortage_weeks = as_is.iter().filter(|r| r.status == WeekStatus::Shortage).count();
    let excess_weeks = as_is.iter().filter(|r| r.status == WeekStatus::Excess).count();
    let status = if shortage_weeks > 0 {
        MaterialStatus::Shortage
    } else if excess_weeks > 0 {
        MaterialStatus::Excess
    } else {
        MaterialStatus::Ok
    };

    Ok(SummaryRow {
        material,
        initial_stock,
        total_demand,
        average_weekly_demand,
        coverage,
        min_stock,
        required_replenishment,
        proposed_production,
        batch_size,
        first_shortage_week: as_is.iter().find(|r| r.is_shortage()).map(|r| r.week),
        shortage_weeks,
        excess_weeks,
        status,
        error: None,
    })
}
