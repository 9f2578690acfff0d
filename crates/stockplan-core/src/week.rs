//! ISO 週次模型

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{PlanError, Result};

/// 無法解析的週次標籤顯示文字
pub const UNKNOWN_WEEK_LABEL: &str = "unknown format";

/// 週次鍵（ISO 8601 年 + 週）
///
/// 排序依 (year, week)。不同的原始標籤只要正規化後相同，就是同一個週次。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct WeekKey {
    year: i32,
    week: u32,
}

impl WeekKey {
    /// 創建週次鍵（週次必須存在於 ISO 日曆中）
    pub fn new(year: i32, week: u32) -> Result<Self> {
        if NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).is_none() {
            return Err(PlanError::InvalidWeek { year, week });
        }
        Ok(Self { year, week })
    }

    /// 日期所屬的 ISO 週
    pub fn from_date(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// 解析週次標籤
    ///
    /// 支援兩種格式：
    /// - `"<前綴> WW/YY"`：週 = WW，年 = 2000 + YY
    /// - `"WW.YYYY"`：週 = WW，年 = YYYY
    ///
    /// 無法解析或週次不存在時返回 `None`。
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        let (year, week) = parse_slash_form(label).or_else(|| parse_dot_form(label))?;
        Self::new(year, week).ok()
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    /// 該週週一
    pub fn monday(&self) -> NaiveDate {
        // 建構時已驗證週次存在
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon).unwrap_or_default()
    }

    /// 該週週五（工作週結束）
    pub fn friday(&self) -> NaiveDate {
        self.monday() + Duration::days(4)
    }

    /// 工作週日期範圍，例如 `"03.02.2025 - 07.02.2025"`
    pub fn date_range_label(&self) -> String {
        format!(
            "{} - {}",
            self.monday().format("%d.%m.%Y"),
            self.friday().format("%d.%m.%Y")
        )
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}.{}", self.week, self.year)
    }
}

impl FromStr for WeekKey {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| PlanError::UnparseableWeekLabel(s.to_string()))
    }
}

impl From<WeekKey> for String {
    fn from(key: WeekKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for WeekKey {
    type Error = PlanError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// 週次標籤的顯示用日期範圍；無法解析時返回 [`UNKNOWN_WEEK_LABEL`]
pub fn describe_label(label: &str) -> String {
    WeekKey::parse(label)
        .map(|key| key.date_range_label())
        .unwrap_or_else(|| UNKNOWN_WEEK_LABEL.to_string())
}

/// `"<前綴> WW/YY"`，週數前必須是空白
fn parse_slash_form(label: &str) -> Option<(i32, u32)> {
    let (head, year_part) = label.rsplit_once('/')?;
    if year_part.len() != 2 || !year_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let prefix = head.trim_end_matches(|c: char| c.is_ascii_digit());
    let week_part = &head[prefix.len()..];
    if week_part.is_empty() || week_part.len() > 2 || !prefix.ends_with(char::is_whitespace) {
        return None;
    }

    let week = week_part.parse().ok()?;
    let year = 2000 + year_part.parse::<i32>().ok()?;
    Some((year, week))
}

/// `"WW.YYYY"`，取點號前最後一到兩位數字為週數
fn parse_dot_form(label: &str) -> Option<(i32, u32)> {
    let (head, year_part) = label.rsplit_once('.')?;
    if year_part.len() != 4 || !year_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let prefix = head.trim_end_matches(|c: char| c.is_ascii_digit());
    let digits = &head[prefix.len()..];
    if digits.is_empty() {
        return None;
    }
    let week_part = &digits[digits.len().saturating_sub(2)..];

    let week = week_part.parse().ok()?;
    let year = year_part.parse().ok()?;
    Some((year, week))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("KW 05/25", 2025, 5)]
    #[case("Woche 52/24", 2024, 52)]
    #[case("  KW 1/26 ", 2026, 1)]
    #[case("05.2025", 2025, 5)]
    #[case("KW 17.2025", 2025, 17)]
    #[case("1.2026", 2026, 1)]
    fn test_parse_supported_labels(#[case] label: &str, #[case] year: i32, #[case] week: u32) {
        let key = WeekKey::parse(label).unwrap();
        assert_eq!(key.year(), year);
        assert_eq!(key.week(), week);
    }

    #[rstest]
    #[case("Materialnummer")]
    #[case("05/25")] // 週數前沒有空白
    #[case("KW 123/25")]
    #[case("KW 05/2025")]
    #[case("05.25")]
    #[case("00.2025")]
    #[case("54.2025")]
    #[case("53.2025")] // 2025 年只有 52 週
    #[case("")]
    fn test_reject_unparseable_labels(#[case] label: &str) {
        assert!(WeekKey::parse(label).is_none());
    }

    #[test]
    fn test_week_53_in_long_year() {
        // 2026 年有 53 週
        let key = WeekKey::parse("53.2026").unwrap();
        assert_eq!(key.monday(), NaiveDate::from_ymd_opt(2026, 12, 28).unwrap());
    }

    #[test]
    fn test_equivalent_labels_compare_equal() {
        let slash = WeekKey::parse("KW 07/25").unwrap();
        let dot = WeekKey::parse("07.2025").unwrap();
        assert_eq!(slash, dot);
    }

    #[test]
    fn test_ordering_by_year_then_week() {
        let mut keys = vec![
            WeekKey::new(2026, 1).unwrap(),
            WeekKey::new(2025, 52).unwrap(),
            WeekKey::new(2025, 3).unwrap(),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                WeekKey::new(2025, 3).unwrap(),
                WeekKey::new(2025, 52).unwrap(),
                WeekKey::new(2026, 1).unwrap(),
            ]
        );
    }

    #[test]
    fn test_date_range_label() {
        // 2025 第 1 週從 2024-12-30（週一）開始
        let key = WeekKey::new(2025, 1).unwrap();
        assert_eq!(key.date_range_label(), "30.12.2024 - 03.01.2025");

        let key = WeekKey::new(2025, 6).unwrap();
        assert_eq!(key.date_range_label(), "03.02.2025 - 07.02.2025");
    }

    #[test]
    fn test_render_then_parse_roundtrip() {
        for label in ["KW 09/25", "09.2025"] {
            let key = WeekKey::parse(label).unwrap();
            assert_eq!(WeekKey::parse(&key.to_string()), Some(key));
        }
    }

    #[test]
    fn test_from_date_uses_iso_year() {
        // 2024-12-30 屬於 ISO 2025 年第 1 週
        let date = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
        assert_eq!(WeekKey::from_date(date), WeekKey::new(2025, 1).unwrap());
    }

    #[test]
    fn test_describe_unknown_label() {
        assert_eq!(describe_label("Summe"), UNKNOWN_WEEK_LABEL);
        assert_eq!(describe_label("KW 06/25"), "03.02.2025 - 07.02.2025");
    }

    #[test]
    fn test_serde_as_label() {
        let key = WeekKey::new(2025, 5).unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"05.2025\"");
        let back: WeekKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
