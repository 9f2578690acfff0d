//! 物料供需序列模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::week::WeekKey;
use crate::{MaterialNumber, PlanError, Result};

/// 單據類別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentClass {
    /// 生產入庫（ZP），以訂購數量計
    Production,
    /// 銷售/消耗單據（ZS、OR），以確認數量計
    Consumption,
    /// 其他單據
    Other,
}

impl DocumentClass {
    /// 依單據號碼判斷類別
    pub fn classify(document: &str) -> Self {
        let upper = document.to_uppercase();
        if upper.contains("ZP") {
            DocumentClass::Production
        } else if upper.contains("ZS") || upper.contains("OR") {
            DocumentClass::Consumption
        } else {
            DocumentClass::Other
        }
    }

    /// 是否計入供應（消耗單據計入出庫）
    pub fn is_supply(&self) -> bool {
        !matches!(self, DocumentClass::Consumption)
    }
}

/// 單筆預計收發記錄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingRecord {
    /// 單據號碼
    pub document: String,

    /// 單據類別
    pub class: DocumentClass,

    /// 訂購數量
    pub ordered_qty: Decimal,

    /// 確認數量
    pub confirmed_qty: Decimal,

    /// 交貨日期
    pub delivery_date: NaiveDate,
}

impl IncomingRecord {
    /// 創建新的記錄（類別由單據號碼判斷）
    pub fn new(
        document: String,
        ordered_qty: Decimal,
        confirmed_qty: Decimal,
        delivery_date: NaiveDate,
    ) -> Self {
        let class = DocumentClass::classify(&document);
        Self {
            document,
            class,
            ordered_qty,
            confirmed_qty,
            delivery_date,
        }
    }

    /// 計入的數量
    ///
    /// 生產單據取訂購數量，消耗單據取確認數量，
    /// 其他單據優先取確認數量（為正時），否則取訂購數量。
    pub fn counted_quantity(&self) -> Decimal {
        match self.class {
            DocumentClass::Production => self.ordered_qty,
            DocumentClass::Consumption => self.confirmed_qty,
            DocumentClass::Other => {
                if self.confirmed_qty > Decimal::ZERO {
                    self.confirmed_qty
                } else {
                    self.ordered_qty
                }
            }
        }
    }

    /// 交貨所在週
    pub fn week(&self) -> WeekKey {
        WeekKey::from_date(self.delivery_date)
    }

    /// 是否為有效的生產批次（用於推導標準批量）
    pub fn is_production_lot(&self) -> bool {
        self.class == DocumentClass::Production && self.ordered_qty > Decimal::ZERO
    }
}

/// 物料庫存帳
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLedger {
    /// 物料編號
    pub material: MaterialNumber,

    /// 期初庫存
    pub initial_stock: Decimal,

    /// 預計收發記錄
    pub records: Vec<IncomingRecord>,
}

impl MaterialLedger {
    /// 創建新的庫存帳
    pub fn new(material: MaterialNumber, initial_stock: Decimal) -> Self {
        Self {
            material,
            initial_stock,
            records: Vec::new(),
        }
    }

    /// 建構器模式：設置記錄
    pub fn with_records(mut self, records: Vec<IncomingRecord>) -> Self {
        self.records = records;
        self
    }

    /// 添加記錄
    pub fn add_record(&mut self, record: IncomingRecord) {
        self.records.push(record);
    }

    /// 記錄觀察到的庫存值，多個值不一致時以最大值為準
    pub fn observe_stock(&mut self, on_hand: Decimal) {
        if on_hand > self.initial_stock {
            self.initial_stock = on_hand;
        }
    }

    /// 每週供應量（生產與其他單據）
    pub fn weekly_incoming(&self) -> Result<BTreeMap<WeekKey, Decimal>> {
        self.aggregate_weekly("供應", |record| record.class.is_supply())
    }

    /// 每週消耗量（消耗單據）
    pub fn weekly_consumption(&self) -> Result<BTreeMap<WeekKey, Decimal>> {
        self.aggregate_weekly("消耗", |record| !record.class.is_supply())
    }

    /// 生產批次記錄
    pub fn production_lots(&self) -> impl Iterator<Item = &IncomingRecord> {
        self.records.iter().filter(|r| r.is_production_lot())
    }

    fn aggregate_weekly<F>(&self, name: &str, include: F) -> Result<BTreeMap<WeekKey, Decimal>>
    where
        F: Fn(&IncomingRecord) -> bool,
    {
        let mut weekly = BTreeMap::new();
        for record in self.records.iter().filter(|r| include(r)) {
            let quantity = record.counted_quantity();
            if quantity <= Decimal::ZERO {
                continue;
            }

            let week = record.week();
            let slot = weekly.entry(week).or_insert(Decimal::ZERO);
            *slot = slot
                .checked_add(quantity)
                .ok_or_else(|| PlanError::InvalidSeries {
                    material: self.material,
                    reason: format!("第 {} 週{}累加超出數量範圍", week, name),
                })?;
        }
        Ok(weekly)
    }
}

/// 物料週序列（稀疏，缺少的週視為 0）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialSeries {
    /// 物料編號
    pub material: MaterialNumber,

    /// 期初庫存
    pub initial_stock: Decimal,

    /// 預測需求
    pub demand: BTreeMap<WeekKey, Decimal>,

    /// 預計供應
    pub incoming: BTreeMap<WeekKey, Decimal>,

    /// 預計消耗
    pub consumption: BTreeMap<WeekKey, Decimal>,
}

impl MaterialSeries {
    /// 由庫存帳與需求預測組成序列
    pub fn from_ledger(
        ledger: &MaterialLedger,
        demand: BTreeMap<WeekKey, Decimal>,
    ) -> Result<Self> {
        Ok(Self {
            material: ledger.material,
            initial_stock: ledger.initial_stock,
            demand,
            incoming: ledger.weekly_incoming()?,
            consumption: ledger.weekly_consumption()?,
        })
    }

    /// 指定週的需求
    pub fn demand_at(&self, week: &WeekKey) -> Decimal {
        self.demand.get(week).copied().unwrap_or(Decimal::ZERO)
    }

    /// 指定週的供應
    pub fn incoming_at(&self, week: &WeekKey) -> Decimal {
        self.incoming.get(week).copied().unwrap_or(Decimal::ZERO)
    }

    /// 指定週的消耗
    pub fn consumption_at(&self, week: &WeekKey) -> Decimal {
        self.consumption.get(week).copied().unwrap_or(Decimal::ZERO)
    }

    /// 對齊到週軸，產生密集序列
    ///
    /// 不在週軸上的供應/消耗不參與模擬。
    pub fn align(&self, weeks: &[WeekKey]) -> AlignedSeries {
        AlignedSeries {
            material: self.material,
            weeks: weeks.to_vec(),
            demand: weeks.iter().map(|w| self.demand_at(w)).collect(),
            incoming: weeks.iter().map(|w| self.incoming_at(w)).collect(),
            consumption: weeks.iter().map(|w| self.consumption_at(w)).collect(),
        }
    }
}

/// 對齊到週軸的密集序列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedSeries {
    pub material: MaterialNumber,
    pub weeks: Vec<WeekKey>,
    pub demand: Vec<Decimal>,
    pub incoming: Vec<Decimal>,
    pub consumption: Vec<Decimal>,
}

impl AlignedSeries {
    /// 創建對齊序列
    pub fn new(
        material: MaterialNumber,
        weeks: Vec<WeekKey>,
        demand: Vec<Decimal>,
        incoming: Vec<Decimal>,
        consumption: Vec<Decimal>,
    ) -> Self {
        Self {
            material,
            weeks,
            demand,
            incoming,
            consumption,
        }
    }

    /// 週數
    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    /// 檢查序列是否可模擬
    ///
    /// 各序列長度必須一致、週次嚴格遞增、數量不可為負。
    pub fn validate(&self) -> Result<()> {
        let n = self.weeks.len();
        if self.demand.len() != n || self.incoming.len() != n || self.consumption.len() != n {
            return Err(self.invalid(format!(
                "序列長度不一致：週 {}，需求 {}，供應 {}，消耗 {}",
                n,
                self.demand.len(),
                self.incoming.len(),
                self.consumption.len()
            )));
        }

        if let Some(pair) = self.weeks.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(self.invalid(format!("週次未遞增：{} 之後為 {}", pair[0], pair[1])));
        }

        for (name, values) in [
            ("需求", &self.demand),
            ("供應", &self.incoming),
            ("消耗", &self.consumption),
        ] {
            if let Some(i) = values.iter().position(|v| *v < Decimal::ZERO) {
                return Err(self.invalid(format!(
                    "{} 在 {} 為負數: {}",
                    name, self.weeks[i], values[i]
                )));
            }
        }

        Ok(())
    }

    fn invalid(&self, reason: String) -> PlanError {
        PlanError::InvalidSeries {
            material: self.material,
            reason,
        }
    }
}
