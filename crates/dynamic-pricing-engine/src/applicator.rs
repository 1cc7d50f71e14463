//! 动作应用器
//!
//! 按优先级顺序依次应用匹配规则的动作，串联计算出候选价格。
//! 候选价格不做边界处理，安全边界由 SafetyBounds 统一负责。

use crate::models::{Action, CompetitorPrice, Rule};

/// 候选价格
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub price: f64,
    /// 是否有任何规则改动过价格
    pub changed: bool,
}

/// 动作应用器
pub struct ActionApplicator;

impl ActionApplicator {
    /// 串联应用已排序规则的动作，得到候选价格
    ///
    /// # Arguments
    /// * `current_price` - 变体的当前售价，作为起始候选价
    /// * `inventory_level` - 当前可用库存
    /// * `competitor_prices` - 该商品的竞争对手价格观测值
    /// * `rules` - 已按优先级升序排列的规则
    pub fn compute_candidate(
        current_price: f64,
        inventory_level: i64,
        competitor_prices: &[CompetitorPrice],
        rules: &[&Rule],
    ) -> Candidate {
        let mut price = current_price;
        let mut changed = false;

        for rule in rules {
            match &rule.action {
                Action::FixedPrice { value } => {
                    price = *value;
                    changed = true;
                }
                Action::PercentageAdjustment { value } => {
                    price *= 1.0 + value / 100.0;
                    changed = true;
                }
                Action::FixedAdjustment { value } => {
                    price += value;
                    changed = true;
                }
                Action::MatchCompetitor {
                    competitor,
                    offset_percentage,
                } => {
                    // 找不到对应的竞争对手时此规则不生效，继续应用后续规则
                    if let Some(observed) = competitor_prices
                        .iter()
                        .find(|cp| cp.competitor == *competitor)
                    {
                        price = observed.price * (1.0 + offset_percentage / 100.0);
                        changed = true;
                    }
                }
                Action::InventoryBased {
                    threshold,
                    low_adjustment,
                    high_adjustment,
                } => {
                    // 注意：inventory_based 始终以原始售价为基准，而非链式
                    // 累计的候选价。这是沿用旧系统的行为，与其他动作类型不
                    // 一致；在与业务方确认意图之前不要改成链式计算。
                    let adjustment = if inventory_level <= *threshold {
                        low_adjustment
                    } else {
                        high_adjustment
                    };
                    price = current_price * (1.0 + adjustment / 100.0);
                    changed = true;
                }
            }
        }

        Candidate { price, changed }
    }
}
