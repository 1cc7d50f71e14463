//! 定价引擎
//!
//! 把规则匹配、动作应用和安全边界编排成单个变体的定价决策。
//! 引擎持有一份加载时校验过的只读规则集，本身不做任何 I/O，
//! 单次 `price_for` 调用是纯计算，可安全地在多个工作线程间并发调用。

use crate::applicator::ActionApplicator;
use crate::bounds::{SafetyBounds, round_to_cents};
use crate::matcher::RuleMatcher;
use crate::models::{CompetitorPrice, PriceDecision, Product, RuleSet, Variant};
use tracing::debug;

/// 定价引擎
///
/// 通过依赖注入持有不可变配置，进程内不存在可变全局状态。
pub struct PricingEngine {
    rule_set: RuleSet,
}

impl PricingEngine {
    /// 用已校验的规则集构建引擎
    ///
    /// 规则集的结构校验在 `RuleSetLoader` 中完成；校验失败的配置
    /// 不会产出规则集，引擎因此不会以残缺配置启动。
    pub fn new(rule_set: RuleSet) -> Self {
        Self { rule_set }
    }

    /// 计算单个商品变体的定价决策
    ///
    /// 无规则命中或动作未改价时，原价原样返回且 `changed = false`，
    /// 不应用安全边界。有改价时先裁剪再比较，`changed` 反映裁剪后的
    /// 最终价是否与当前价不同。
    pub fn price_for(
        &self,
        product: &Product,
        variant: &Variant,
        inventory_level: i64,
        competitor_prices: &[CompetitorPrice],
    ) -> PriceDecision {
        let current_price = variant.price;

        let matcher = RuleMatcher::new(&self.rule_set);
        let outcome = matcher.applicable_rules(product);

        if outcome.rules.is_empty() {
            debug!(
                product_id = product.id,
                variant_id = variant.id,
                "没有适用的定价规则"
            );
            return PriceDecision {
                price: current_price,
                changed: false,
                warnings: outcome.warnings,
            };
        }

        let candidate = ActionApplicator::compute_candidate(
            current_price,
            inventory_level,
            competitor_prices,
            &outcome.rules,
        );

        if !candidate.changed {
            return PriceDecision {
                price: current_price,
                changed: false,
                warnings: outcome.warnings,
            };
        }

        let bounded =
            SafetyBounds::clamp(candidate.price, current_price, &self.rule_set.global_settings);
        let changed = bounded != round_to_cents(current_price);

        debug!(
            product_id = product.id,
            variant_id = variant.id,
            current_price,
            candidate = candidate.price,
            bounded,
            "定价决策完成"
        );

        PriceDecision {
            price: bounded,
            changed,
            warnings: outcome.warnings,
        }
    }
}
