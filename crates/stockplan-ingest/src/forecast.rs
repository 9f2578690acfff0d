//! 需求預測表正規化

use rust_decimal::Decimal;
use stockplan_core::{ForecastTable, WeekIndex, WeekKey};

use crate::columns::MATERIAL;
use crate::error::{IngestError, Result};
use crate::numbers::{parse_locale_decimal, parse_material_number};
use crate::table::RawTable;

const TABLE: &str = "forecast";

/// 正規化後的需求預測
#[derive(Debug, Clone, Default)]
pub struct ForecastBatch {
    pub forecast: ForecastTable,

    /// 週次欄位構成的週軸
    pub weeks: WeekIndex,

    /// 非致命問題
    pub issues: Vec<IngestError>,

    /// 因物料編號無效而略過的列數
    pub skipped_rows: usize,
}

/// 正規化需求預測表
///
/// 寬表格式：一欄物料編號，其餘可解析為週次的欄位為需求量。
pub fn normalize_forecast(table: &RawTable) -> Result<ForecastBatch> {
    let material_col = table.require_column(TABLE, &MATERIAL)?;

    let mut batch = ForecastBatch::default();

    let labels: Vec<(usize, &str)> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(col, _)| *col != material_col)
        .map(|(col, header)| (col, header.trim()))
        .collect();

    let (weeks, rejected) = WeekIndex::from_labels(labels.iter().map(|(_, label)| *label));
    batch
        .issues
        .extend(rejected.into_iter().map(IngestError::UnparseableWeekLabel));

    if weeks.is_empty() {
        return Err(IngestError::NoWeekColumns);
    }
    if table.is_empty() {
        return Err(IngestError::EmptyTable { table: TABLE });
    }

    let week_cols: Vec<(usize, WeekKey)> = labels
        .iter()
        .filter_map(|(col, label)| WeekKey::parse(label).map(|week| (*col, week)))
        .collect();
    batch.weeks = weeks;

    for row in 0..table.len() {
        let Some(material) = parse_material_number(table.cell(row, material_col)) else {
            tracing::debug!("略過第 {} 列：物料編號無效", RawTable::row_number(row));
            batch.skipped_rows += 1;
            continue;
        };

        for (col, week) in &week_cols {
            let raw = table.cell(row, *col);
            let invalid = || IngestError::InvalidNumber {
                row: RawTable::row_number(row),
                column: "demand",
                value: raw.to_string(),
            };

            let Some(quantity) = parse_locale_decimal(raw) else {
                batch.issues.push(invalid());
                batch.forecast.add(material, *week, Decimal::ZERO).ok();
                continue;
            };
            if let Err(e) = batch.forecast.add(material, *week, quantity) {
                tracing::warn!("第 {} 列需求無法累加: {}", RawTable::row_number(row), e);
                batch.issues.push(invalid());
            }
        }
    }

    tracing::info!(
        "需求預測正規化完成：物料 {} 個，週次 {} 個，問題 {} 個",
        batch.forecast.len(),
        batch.weeks.len(),
        batch.issues.len()
    );

    Ok(batch)
}
