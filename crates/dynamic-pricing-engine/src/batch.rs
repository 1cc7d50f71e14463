//! 批量定价
//!
//! 对一份市场快照中的所有商品变体逐个执行定价决策，汇总统计结果。
//! 每个变体的计算相互独立：单个变体的评估错误只记入该变体的结果，
//! 不会中断批次中的其余变体。

use crate::engine::PricingEngine;
use crate::error::ConfigError;
use crate::models::{CompetitorPrice, InventoryLevels, Product, Variant};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// 商品记录：商品本体加上它的所有变体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(flatten)]
    pub product: Product,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

/// 市场快照
///
/// 一次批量定价所需的全部输入：商品、库存水位、竞争对手价格。
/// 快照由外部采集组件产出，引擎只消费不获取。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingSnapshot {
    #[serde(default)]
    pub products: Vec<ProductRecord>,
    #[serde(default)]
    pub inventory_levels: InventoryLevels,
    /// 以商品 ID 为键的竞争对手价格观测值
    #[serde(default)]
    pub competitor_prices: HashMap<i64, Vec<CompetitorPrice>>,
}

impl PricingSnapshot {
    /// 从 JSON 文件加载快照
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// 单个变体的处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Updated,
    Unchanged,
    /// 评估过程出现被恢复的错误（价格仍然产出）
    Errored,
}

/// 单个变体的处理结果
#[derive(Debug, Clone, Serialize)]
pub struct VariantOutcome {
    pub product_id: i64,
    pub variant_id: i64,
    pub current_price: f64,
    pub new_price: f64,
    pub changed: bool,
    pub status: OutcomeStatus,
    pub warnings: Vec<String>,
}

/// 批次汇总统计
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub products_processed: usize,
    pub variants_updated: usize,
    pub price_increases: usize,
    pub price_decreases: usize,
    pub unchanged: usize,
    pub errored: usize,
}

/// 批次报告
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<VariantOutcome>,
    pub summary: BatchSummary,
}

/// 对快照执行一次批量定价
pub fn run_batch(engine: &PricingEngine, snapshot: &PricingSnapshot) -> BatchReport {
    let mut outcomes = Vec::new();
    let mut summary = BatchSummary::default();

    for record in &snapshot.products {
        let product = &record.product;
        let empty = Vec::new();
        let competitor_prices = snapshot
            .competitor_prices
            .get(&product.id)
            .unwrap_or(&empty);

        for variant in &record.variants {
            let inventory_level = snapshot
                .inventory_levels
                .available(variant.inventory_item_id);

            let decision =
                engine.price_for(product, variant, inventory_level, competitor_prices);

            let status = if !decision.warnings.is_empty() {
                summary.errored += 1;
                OutcomeStatus::Errored
            } else if decision.changed {
                OutcomeStatus::Updated
            } else {
                summary.unchanged += 1;
                OutcomeStatus::Unchanged
            };

            if decision.changed {
                summary.variants_updated += 1;
                if decision.price > variant.price {
                    summary.price_increases += 1;
                } else {
                    summary.price_decreases += 1;
                }
            }

            outcomes.push(VariantOutcome {
                product_id: product.id,
                variant_id: variant.id,
                current_price: variant.price,
                new_price: decision.price,
                changed: decision.changed,
                status,
                warnings: decision.warnings,
            });
        }

        summary.products_processed += 1;
    }

    info!(
        products_processed = summary.products_processed,
        variants_updated = summary.variants_updated,
        price_increases = summary.price_increases,
        price_decreases = summary.price_decreases,
        unchanged = summary.unchanged,
        errored = summary.errored,
        "批量定价完成"
    );

    BatchReport { outcomes, summary }
}
