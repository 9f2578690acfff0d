//! 分析輸入模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use crate::series::MaterialLedger;
use crate::week::WeekKey;
use crate::{MaterialNumber, PlanError, Result};

/// 需求預測表：物料 → 週 → 需求量
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastTable {
    demand: BTreeMap<MaterialNumber, BTreeMap<WeekKey, Decimal>>,
}

impl ForecastTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 累加某物料某週的需求
    ///
    /// 累加結果超出數量範圍時返回錯誤，原值不變。
    pub fn add(
        &mut self,
        material: MaterialNumber,
        week: WeekKey,
        quantity: Decimal,
    ) -> Result<()> {
        let slot = self
            .demand
            .entry(material)
            .or_default()
            .entry(week)
            .or_insert(Decimal::ZERO);
        *slot = slot
            .checked_add(quantity)
            .ok_or_else(|| PlanError::InvalidSeries {
                material,
                reason: format!("第 {} 週需求累加超出數量範圍", week),
            })?;
        Ok(())
    }

    /// 建構器模式：設置物料的整列需求（同一週以後者為準）
    pub fn with_material(
        mut self,
        material: MaterialNumber,
        demand: impl IntoIterator<Item = (WeekKey, Decimal)>,
    ) -> Self {
        self.demand.entry(material).or_default().extend(demand);
        self
    }

    /// 物料需求
    pub fn demand_for(&self, material: MaterialNumber) -> Option<&BTreeMap<WeekKey, Decimal>> {
        self.demand.get(&material)
    }

    /// 所有物料（依編號排序）
    pub fn materials(&self) -> impl Iterator<Item = MaterialNumber> + '_ {
        self.demand.keys().copied()
    }

    /// 所有物料出現過的週次聯集
    pub fn week_keys(&self) -> BTreeSet<WeekKey> {
        self.demand
            .values()
            .flat_map(|weeks| weeks.keys().copied())
            .collect()
    }

    pub fn contains(&self, material: MaterialNumber) -> bool {
        self.demand.contains_key(&material)
    }

    pub fn len(&self) -> usize {
        self.demand.len()
    }

    pub fn is_empty(&self) -> bool {
        self.demand.is_empty()
    }
}

/// 庫存帳表：物料 → 庫存帳
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerTable {
    ledgers: BTreeMap<MaterialNumber, MaterialLedger>,
}

impl LedgerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入庫存帳（同一物料會被覆蓋）
    pub fn insert(&mut self, ledger: MaterialLedger) {
        self.ledgers.insert(ledger.material, ledger);
    }

    /// 建構器模式：添加庫存帳
    pub fn with_ledger(mut self, ledger: MaterialLedger) -> Self {
        self.insert(ledger);
        self
    }

    /// 記錄物料的在庫數量
    ///
    /// 第一次出現的物料以該值為期初庫存，之後取觀察到的最大值。
    pub fn observe_stock(
        &mut self,
        material: MaterialNumber,
        on_hand: Decimal,
    ) -> &mut MaterialLedger {
        match self.ledgers.entry(material) {
            Entry::Occupied(entry) => {
                let ledger = entry.into_mut();
                ledger.observe_stock(on_hand);
                ledger
            }
            Entry::Vacant(entry) => entry.insert(MaterialLedger::new(material, on_hand)),
        }
    }

    pub fn get(&self, material: MaterialNumber) -> Option<&MaterialLedger> {
        self.ledgers.get(&material)
    }

    pub fn materials(&self) -> impl Iterator<Item = MaterialNumber> + '_ {
        self.ledgers.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.ledgers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledgers.is_empty()
    }
}

/// 單次分析的完整輸入（不可變）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub forecast: ForecastTable,
    pub ledgers: LedgerTable,
}

impl AnalysisInput {
    pub fn new(forecast: ForecastTable, ledgers: LedgerTable) -> Self {
        Self { forecast, ledgers }
    }

    /// 只在庫存帳中的物料
    pub fn ledger_only(&self) -> Vec<MaterialNumber> {
        self.ledgers
            .materials()
            .filter(|m| !self.forecast.contains(*m))
            .collect()
    }
}
