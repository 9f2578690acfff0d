//! 庫存帳表正規化

use rust_decimal::Decimal;
use stockplan_core::{IncomingRecord, LedgerTable};

use crate::columns::{Column, CONFIRMED, DELIVERY_DATE, DOCUMENT, MATERIAL, ON_HAND, ORDERED};
use crate::error::{IngestError, Result};
use crate::numbers::{parse_delivery_date, parse_locale_decimal, parse_material_number};
use crate::table::RawTable;

const TABLE: &str = "ledger";

/// 正規化後的庫存帳
#[derive(Debug, Clone, Default)]
pub struct LedgerBatch {
    pub ledgers: LedgerTable,

    /// 非致命問題
    pub issues: Vec<IngestError>,

    /// 因物料編號無效而略過的列數
    pub skipped_rows: usize,
}

struct LedgerColumns {
    material: usize,
    document: usize,
    delivery_date: usize,
    ordered: usize,
    confirmed: usize,
    on_hand: usize,
}

impl LedgerColumns {
    fn locate(table: &RawTable) -> Result<Self> {
        Ok(Self {
            material: table.require_column(TABLE, &MATERIAL)?,
            document: table.require_column(TABLE, &DOCUMENT)?,
            delivery_date: table.require_column(TABLE, &DELIVERY_DATE)?,
            ordered: table.require_column(TABLE, &ORDERED)?,
            confirmed: table.require_column(TABLE, &CONFIRMED)?,
            on_hand: table.require_column(TABLE, &ON_HAND)?,
        })
    }
}

/// 正規化庫存帳表
///
/// 每列為一張單據；期初庫存取該物料所有列中最大的在庫數量，
/// 以第一筆觀測值為起點（全為負數時保留負值）。
/// 沒有單據號碼的列只提供在庫數量。
pub fn normalize_ledger(table: &RawTable) -> Result<LedgerBatch> {
    let cols = LedgerColumns::locate(table)?;
    if table.is_empty() {
        return Err(IngestError::EmptyTable { table: TABLE });
    }

    let mut batch = LedgerBatch::default();
    let mut records = 0usize;

    for row in 0..table.len() {
        let Some(material) = parse_material_number(table.cell(row, cols.material)) else {
            tracing::debug!("略過第 {} 列：物料編號無效", RawTable::row_number(row));
            batch.skipped_rows += 1;
            continue;
        };

        let on_hand = quantity(table, row, cols.on_hand, &ON_HAND, &mut batch.issues);
        let ledger = batch.ledgers.observe_stock(material, on_hand);

        let document = table.cell(row, cols.document);
        if document.is_empty() {
            continue;
        }

        let raw_date = table.cell(row, cols.delivery_date);
        let Some(delivery_date) = parse_delivery_date(raw_date) else {
            tracing::warn!(
                "物料 {} 單據 {} 的交貨日期無法解析: {:?}",
                material,
                document,
                raw_date
            );
            batch.issues.push(IngestError::UnparseableDate {
                row: RawTable::row_number(row),
                value: raw_date.to_string(),
            });
            continue;
        };

        let ordered = quantity(table, row, cols.ordered, &ORDERED, &mut batch.issues);
        let confirmed = quantity(table, row, cols.confirmed, &CONFIRMED, &mut batch.issues);

        ledger.add_record(IncomingRecord::new(
            document.to_string(),
            ordered,
            confirmed,
            delivery_date,
        ));
        records += 1;
    }

    tracing::info!(
        "庫存帳正規化完成：物料 {} 個，單據 {} 筆，問題 {} 個",
        batch.ledgers.len(),
        records,
        batch.issues.len()
    );

    Ok(batch)
}

/// 解析數量欄位，無法解析時記錄問題並視為 0
fn quantity(
    table: &RawTable,
    row: usize,
    col: usize,
    column: &Column,
    issues: &mut Vec<IngestError>,
) -> Decimal {
    let raw = table.cell(row, col);
    parse_locale_decimal(raw).unwrap_or_else(|| {
        issues.push(IngestError::InvalidNumber {
            row: RawTable::row_number(row),
            column: column.name,
            value: raw.to_string(),
        });
        Decimal::ZERO
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use stockplan_core::{DocumentClass, WeekKey};

    const HEADERS: [&str; 6] = [
        "numer indeksu",
        "DocNum",
        "Data dostawy",
        "Zamówione",
        "Potwierdzone",
        "w magazynie",
    ];

    #[test]
    fn test_normalize_ledger() {
        let table = RawTable::new(HEADERS)
            .with_row(["1001", "", "", "", "", "120"])
            .with_row(["1001", "ZP/2025/1", "03-02-2025", "250", "0", "120"])
            .with_row(["1001", "ZS/2025/7", "12.02.2025", "40", "35,5", "118"])
            .with_row(["1002", "ZP/2025/2", "2025-02-10", "1 000", "", "0"]);

        let batch = normalize_ledger(&table).unwrap();
        assert!(batch.issues.is_empty());

        let ledger = batch.ledgers.get(1001).unwrap();
        assert_eq!(ledger.initial_stock, Decimal::from(120));
        assert_eq!(ledger.records.len(), 2);
        assert_eq!(ledger.records[0].class, DocumentClass::Production);
        assert_eq!(
            ledger.records[0].delivery_date,
            NaiveDate::from_ymd_opt(2025, 2, 3).unwrap()
        );
        assert_eq!(ledger.records[1].confirmed_qty, Decimal::new(355, 1));

        let consumption = ledger.weekly_consumption().unwrap();
        assert_eq!(
            consumption[&WeekKey::new(2025, 7).unwrap()],
            Decimal::new(355, 1)
        );

        let other = batch.ledgers.get(1002).unwrap();
        assert_eq!(other.records[0].ordered_qty, Decimal::from(1000));
        assert_eq!(other.initial_stock, Decimal::ZERO);
    }

    #[test]
    fn test_bad_date_excludes_record() {
        let table = RawTable::new(HEADERS)
            .with_row(["1001", "ZP/1", "not a date", "100", "0", "10"])
            .with_row(["1001", "ZP/2", "10-02-2025", "50", "0", "10"]);

        let batch = normalize_ledger(&table).unwrap();
        let ledger = batch.ledgers.get(1001).unwrap();

        assert_eq!(ledger.records.len(), 1);
        assert_eq!(ledger.records[0].document, "ZP/2");
        assert_eq!(
            batch.issues,
            vec![IngestError::UnparseableDate {
                row: 2,
                value: "not a date".to_string(),
            }]
        );
    }

    #[test]
    fn test_invalid_quantity_counts_as_zero() {
        let table = RawTable::new(HEADERS).with_row(["1001", "ZP/1", "10-02-2025", "abc", "0", "5"]);

        let batch = normalize_ledger(&table).unwrap();
        assert_eq!(batch.ledgers.get(1001).unwrap().records[0].ordered_qty, Decimal::ZERO);
        assert!(matches!(
            batch.issues[0],
            IngestError::InvalidNumber { row: 2, column: "ordered", .. }
        ));
    }

    #[test]
    fn test_alternative_headers() {
        let table = RawTable::new([
            "Materialnummer",
            "Dokument",
            "Data dostawy",
            "Zamówione",
            "Potwierdzone",
            "Dostępne",
        ])
        .with_row(["5", "OR/1", "10-02-2025", "0", "7", "3"]);

        let batch = normalize_ledger(&table).unwrap();
        let ledger = batch.ledgers.get(5).unwrap();
        assert_eq!(ledger.initial_stock, Decimal::from(3));
        assert_eq!(ledger.records[0].class, DocumentClass::Consumption);
    }

    #[test]
    fn test_missing_on_hand_column() {
        let table = RawTable::new(HEADERS[..5].iter().copied()).with_row(["1", "ZP/1", "10-02-2025", "1", "1"]);
        assert_eq!(
            normalize_ledger(&table).unwrap_err(),
            IngestError::MissingColumn {
                table: "ledger",
                column: "on_hand",
            }
        );
    }

    #[test]
    fn test_negative_only_stock_is_kept() {
        let table = RawTable::new(HEADERS)
            .with_row(["1001", "", "", "", "", "-5"])
            .with_row(["1001", "", "", "", "", "-8"])
            .with_row(["1002", "", "", "", "", "-5"])
            .with_row(["1002", "ZP/9", "10-02-2025", "10", "0", "4"]);

        let batch = normalize_ledger(&table).unwrap();
        assert_eq!(batch.ledgers.get(1001).unwrap().initial_stock, Decimal::from(-5));
        assert_eq!(batch.ledgers.get(1002).unwrap().initial_stock, Decimal::from(4));
    }

    #[test]
    fn test_two_digit_year_delivery_date() {
        let table = RawTable::new(HEADERS).with_row(["1001", "ZP/1", "03.02.25", "60", "0", "0"]);

        let batch = normalize_ledger(&table).unwrap();
        assert!(batch.issues.is_empty());

        let ledger = batch.ledgers.get(1001).unwrap();
        let incoming = ledger.weekly_incoming().unwrap();
        assert_eq!(incoming[&WeekKey::new(2025, 6).unwrap()], Decimal::from(60));
    }
}
