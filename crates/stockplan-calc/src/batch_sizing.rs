//! 標準批量推導

use rust_decimal::Decimal;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use stockplan_core::{BatchSizeStrategy, MaterialLedger, PlanConfig};

/// 批量推導器
pub struct BatchSizer;

impl BatchSizer {
    /// 依配置推導物料的標準批量
    ///
    /// 沒有正數量的生產入庫記錄時返回 `None`。
    pub fn derive(ledger: &MaterialLedger, config: &PlanConfig) -> Option<Decimal> {
        match config.batch_size_strategy {
            BatchSizeStrategy::FirstReceipt => Self::first_receipt(ledger),
            BatchSizeStrategy::CommonDivisor => {
                let lots: Vec<Decimal> = ledger.production_lots().map(|r| r.ordered_qty).collect();
                Self::common_divisor(&lots, config.min_common_divisor)
            }
        }
    }

    /// 依交期排序後第一筆生產入庫的數量（同日取輸入順序中的第一筆）
    pub fn first_receipt(ledger: &MaterialLedger) -> Option<Decimal> {
        ledger
            .production_lots()
            .min_by_key(|r| r.delivery_date)
            .map(|r| r.ordered_qty)
    }

    /// 所有批量的最大公約數
    ///
    /// 公約數低於 `floor` 時改用出現次數最多的批量（同次數取較小者）。
    pub fn common_divisor(lots: &[Decimal], floor: Decimal) -> Option<Decimal> {
        let positive: Vec<Decimal> = lots.iter().copied().filter(|q| *q > Decimal::ZERO).collect();
        let gcd = positive.iter().copied().reduce(decimal_gcd)?.normalize();

        if gcd < floor {
            tracing::debug!("公約數批量 {} 低於下限 {}，改用最常見批量", gcd, floor);
            most_frequent(&positive)
        } else {
            Some(gcd)
        }
    }
}

/// 十進位數的最大公約數（輾轉相除）
fn decimal_gcd(mut a: Decimal, mut b: Decimal) -> Decimal {
    while !b.is_zero() {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

fn most_frequent(lots: &[Decimal]) -> Option<Decimal> {
    let mut counts: BTreeMap<Decimal, usize> = BTreeMap::new();
    for lot in lots {
        *counts.entry(lot.normalize()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .max_by_key(|(lot, count)| (*count, Reverse(*lot)))
        .map(|(lot, _)| lot)
}
