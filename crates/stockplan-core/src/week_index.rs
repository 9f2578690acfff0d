//! 週軸

use crate::input::ForecastTable;
use crate::week::WeekKey;

/// 排序後不重複的週軸
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekIndex {
    weeks: Vec<WeekKey>,
}

impl WeekIndex {
    /// 由週次鍵建立（排序並去重）
    pub fn from_keys(keys: impl IntoIterator<Item = WeekKey>) -> Self {
        let mut weeks: Vec<WeekKey> = keys.into_iter().collect();
        weeks.sort();
        weeks.dedup();
        Self { weeks }
    }

    /// 由原始標籤建立
    ///
    /// 無法解析的標籤不進入週軸，原樣返回給呼叫端。
    pub fn from_labels<I, S>(labels: I) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut keys = Vec::new();
        let mut rejected = Vec::new();

        for label in labels {
            let label = label.as_ref();
            match WeekKey::parse(label) {
                Some(key) => keys.push(key),
                None => rejected.push(label.to_string()),
            }
        }

        (Self::from_keys(keys), rejected)
    }

    /// 需求預測表中所有物料週次的聯集
    pub fn from_forecast(forecast: &ForecastTable) -> Self {
        Self::from_keys(forecast.week_keys())
    }

    pub fn weeks(&self) -> &[WeekKey] {
        &self.weeks
    }

    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }
}
