//! # Stockplan Ingest
//!
//! 來源表格正規化：欄位別名、地區數字格式、週次標籤與交貨日期
//! 只在這一層處理，之後的計算只接觸型別化的資料。

pub mod columns;
pub mod error;
pub mod forecast;
pub mod ledger;
pub mod numbers;
pub mod table;

// Re-export 主要類型
pub use error::{IngestError, Result};
pub use forecast::{normalize_forecast, ForecastBatch};
pub use ledger::{normalize_ledger, LedgerBatch};
pub use numbers::{parse_delivery_date, parse_locale_decimal, parse_material_number};
pub use table::RawTable;
