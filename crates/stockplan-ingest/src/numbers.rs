//! 地區格式數字與日期解析

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::str::FromStr;
use stockplan_core::MaterialNumber;

/// 支援的日期格式（日在前）
const DATE_FORMATS: &[&str] = &[
    "%d-%m-%Y", "%d.%m.%Y", "%d/%m/%Y", "%Y-%m-%d", "%d-%m-%y", "%d.%m.%y", "%d/%m/%y",
];

/// `%Y` 也接受一到三位數的年份，低於此值的結果交給兩位數年份格式
const MIN_FOUR_DIGIT_YEAR: i32 = 1000;

/// 解析地區格式的數字
///
/// 逗號為小數點；空白與點為千分位。只有一個點且沒有逗號時視為小數點。
/// 空字串為 0，無法解析時返回 `None`。
pub fn parse_locale_decimal(value: &str) -> Option<Decimal> {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();

    if compact.is_empty() {
        return Some(Decimal::ZERO);
    }

    let normalized = if compact.contains(',') {
        compact.replace('.', "").replace(',', ".")
    } else if compact.matches('.').count() > 1 {
        compact.replace('.', "")
    } else {
        compact
    };

    Decimal::from_str(&normalized).ok()
}

/// 解析物料編號（接受 `1001` 或 `1001.0` 這類匯出格式）
pub fn parse_material_number(value: &str) -> Option<MaterialNumber> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(number) = value.parse::<MaterialNumber>() {
        return Some(number);
    }

    let decimal = parse_locale_decimal(value)?;
    if decimal.fract().is_zero() && decimal >= Decimal::ZERO {
        decimal.trunc().to_string().parse().ok()
    } else {
        None
    }
}

/// 解析交貨日期（忽略時間部分）
pub fn parse_delivery_date(value: &str) -> Option<NaiveDate> {
    let date_part = value.split_whitespace().next()?;
    DATE_FORMATS
        .iter()
        .filter_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
        .find(|date| date.year() >= MIN_FOUR_DIGIT_YEAR)
}
