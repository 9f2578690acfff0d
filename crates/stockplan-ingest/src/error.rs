//! 匯入錯誤類型

use thiserror::Error;

/// 匯入錯誤
///
/// 表格結構錯誤（缺欄、空表）使整張表失敗；
/// 週次、日期、數字的解析問題只記錄在批次的 `issues` 中。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IngestError {
    #[error("{table} 缺少必要欄位: {column}")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },

    #[error("需求預測中找不到任何週次欄位")]
    NoWeekColumns,

    #[error("無法解析週次標籤: {0}")]
    UnparseableWeekLabel(String),

    #[error("日期格式錯誤 (行 {row}): {value}")]
    UnparseableDate { row: usize, value: String },

    #[error("數字格式錯誤 (行 {row}, 欄位 {column}): {value}")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("{table} 沒有資料列")]
    EmptyTable { table: &'static str },

    #[error("表格讀取失敗: {0}")]
    Read(String),
}

pub type Result<T> = std::result::Result<T, IngestError>;
