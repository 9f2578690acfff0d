//! 檢查溢位的數量運算
//!
//! 溢位一律轉為該物料的 `SimulationFailure`，由彙總計算器轉成錯誤列。

use rust_decimal::Decimal;
use stockplan_core::{MaterialNumber, PlanError, Result};

pub(crate) fn overflow(material: MaterialNumber, what: &str) -> PlanError {
    PlanError::SimulationFailure {
        material,
        reason: format!("{}超出數量範圍", what),
    }
}

pub(crate) fn add(material: MaterialNumber, a: Decimal, b: Decimal, what: &str) -> Result<Decimal> {
    a.checked_add(b).ok_or_else(|| overflow(material, what))
}

pub(crate) fn sub(material: MaterialNumber, a: Decimal, b: Decimal, what: &str) -> Result<Decimal> {
    a.checked_sub(b).ok_or_else(|| overflow(material, what))
}

pub(crate) fn total(material: MaterialNumber, values: &[Decimal], what: &str) -> Result<Decimal> {
    values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
        .ok_or_else(|| overflow(material, what))
}

/// 期末庫存 = 期初 + 收入 - (需求 + 消耗)
pub(crate) fn week_end(
    material: MaterialNumber,
    stock_start: Decimal,
    income: Decimal,
    demand: Decimal,
    consumption: Decimal,
) -> Result<Decimal> {
    demand
        .checked_add(consumption)
        .and_then(|outflow| stock_start.checked_add(income)?.checked_sub(outflow))
        .ok_or_else(|| overflow(material, "期末庫存"))
}
