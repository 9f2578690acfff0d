//! 計劃參數配置

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{PlanError, Result};

/// 模擬與修正參數
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// 過剩判斷的前瞻週數（未來 N 週需求總和作為緩衝）
    pub excess_window: usize,

    /// 標準批量的推導方式
    pub batch_size_strategy: BatchSizeStrategy,

    /// 公約數批量的下限，低於此值改用最常見批量
    pub min_common_divisor: Decimal,

    /// 是否以多執行緒逐物料計算
    pub parallel: bool,
}

impl PlanConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self {
            excess_window: 3,
            batch_size_strategy: BatchSizeStrategy::FirstReceipt,
            min_common_divisor: Decimal::from(10),
            parallel: true,
        }
    }

    /// 從 JSON 載入配置（缺少的欄位使用預設值）
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| PlanError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置過剩前瞻週數
    pub fn with_excess_window(mut self, weeks: usize) -> Self {
        self.excess_window = weeks;
        self
    }

    /// 建構器模式：設置批量推導方式
    pub fn with_batch_size_strategy(mut self, strategy: BatchSizeStrategy) -> Self {
        self.batch_size_strategy = strategy;
        self
    }

    /// 建構器模式：設置公約數下限
    pub fn with_min_common_divisor(mut self, floor: Decimal) -> Self {
        self.min_common_divisor = floor;
        self
    }

    /// 建構器模式：設置是否並行計算
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// 檢查配置是否有效
    pub fn validate(&self) -> Result<()> {
        if self.excess_window == 0 {
            return Err(PlanError::InvalidConfig(
                "excess_window 必須至少為 1".to_string(),
            ));
        }
        if self.min_common_divisor < Decimal::ZERO {
            return Err(PlanError::InvalidConfig(format!(
                "min_common_divisor 不可為負數: {}",
                self.min_common_divisor
            )));
        }
        Ok(())
    }
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// 標準批量推導方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchSizeStrategy {
    /// 依交期排序後第一筆生產入庫的數量
    FirstReceipt,

    /// 所有生產批量的最大公約數（過小時改用最常見批量）
    CommonDivisor,
}
