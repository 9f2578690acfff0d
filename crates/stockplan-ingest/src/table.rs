//! 原始字串表格

use std::io::Read;

use crate::columns::Column;
use crate::error::{IngestError, Result};

/// 未經型別轉換的表格（所有儲存格皆為字串）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// 創建只有表頭的表格
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// 建構器模式：添加資料列
    pub fn with_row<S: Into<String>>(mut self, cells: impl IntoIterator<Item = S>) -> Self {
        self.push_row(cells);
        self
    }

    pub fn push_row<S: Into<String>>(&mut self, cells: impl IntoIterator<Item = S>) {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    /// 讀取分隔字元文字（第一列為表頭）
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| IngestError::Read(e.to_string()))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut table = Self {
            headers,
            rows: Vec::new(),
        };
        for record in reader.records() {
            let record = record.map_err(|e| IngestError::Read(e.to_string()))?;
            table.push_row(record.iter());
        }

        tracing::debug!("讀取表格：{} 欄，{} 列", table.headers.len(), table.rows.len());
        Ok(table)
    }

    /// 讀取以分號分隔的文字
    pub fn from_semicolon_text(text: &str) -> Result<Self> {
        Self::from_reader(text.as_bytes(), b';')
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 依別名尋找欄位（忽略大小寫與前後空白）
    pub fn find_column(&self, column: &Column) -> Option<usize> {
        column.aliases.iter().find_map(|alias| {
            self.headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(alias))
        })
    }

    /// 必要欄位，找不到時整張表失敗
    pub fn require_column(&self, table: &'static str, column: &Column) -> Result<usize> {
        self.find_column(column).ok_or(IngestError::MissingColumn {
            table,
            column: column.name,
        })
    }

    /// 儲存格內容（列過短時視為空字串）
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .map(|c| c.trim())
            .unwrap_or("")
    }

    /// 報表用列號（表頭為第 1 列）
    pub fn row_number(index: usize) -> usize {
        index + 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::{MATERIAL, ON_HAND};

    #[test]
    fn test_from_semicolon_text() {
        let table = RawTable::from_semicolon_text(
            "\u{feff}Materialnummer;KW 05/25;KW 06/25\n1001; 10 ;\"1,5\"\n1002;3\n",
        )
        .unwrap();

        assert_eq!(table.headers, vec!["Materialnummer", "KW 05/25", "KW 06/25"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, 1), "10");
        assert_eq!(table.cell(0, 2), "1,5");
        // 列過短
        assert_eq!(table.cell(1, 2), "");
    }

    #[test]
    fn test_find_column_by_alias() {
        let table = RawTable::new(["DocNum", "numer indeksu", "W MAGAZYNIE"]);

        assert_eq!(table.find_column(&MATERIAL), Some(1));
        assert_eq!(table.find_column(&ON_HAND), Some(2));
    }

    #[test]
    fn test_require_missing_column() {
        let table = RawTable::new(["foo"]);
        assert_eq!(
            table.require_column("forecast", &MATERIAL),
            Err(IngestError::MissingColumn {
                table: "forecast",
                column: "material",
            })
        );
    }
}
