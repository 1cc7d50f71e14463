//! 规则集加载器
//!
//! 把 JSON 配置解析并校验成内存中的只读规则集。
//! 校验在加载阶段一次完成（fail fast），评估阶段不再重复校验。

use crate::error::ConfigError;
use crate::models::{Action, Condition, Rule, RuleSet};
use crate::operators::Operator;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// 规则集加载器
pub struct RuleSetLoader;

impl RuleSetLoader {
    /// 从 JSON 字符串加载规则集
    pub fn load_from_str(json: &str) -> Result<RuleSet, ConfigError> {
        let rule_set: RuleSet = serde_json::from_str(json)?;
        Self::validate(&rule_set)?;
        info!(rule_count = rule_set.rules.len(), "规则集加载完成");
        Ok(rule_set)
    }

    /// 从已解析的 JSON 值加载规则集
    pub fn load_from_value(value: Value) -> Result<RuleSet, ConfigError> {
        let rule_set: RuleSet = serde_json::from_value(value)?;
        Self::validate(&rule_set)?;
        Ok(rule_set)
    }

    /// 从文件加载规则集
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<RuleSet, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str(&content)
    }

    /// 校验规则集
    ///
    /// 任何一处无效配置都会使整体加载失败，不产出部分可用的规则集。
    fn validate(rule_set: &RuleSet) -> Result<(), ConfigError> {
        let mut seen_ids = HashSet::new();

        for rule in &rule_set.rules {
            Self::validate_rule(rule)?;

            if !seen_ids.insert(rule.id.as_str()) {
                return Err(ConfigError::InvalidRule {
                    rule_id: rule.id.clone(),
                    reason: "规则 ID 重复".to_string(),
                });
            }
        }

        Self::validate_settings(rule_set)?;

        Ok(())
    }

    fn validate_rule(rule: &Rule) -> Result<(), ConfigError> {
        if rule.id.is_empty() {
            return Err(ConfigError::InvalidRule {
                rule_id: "<empty>".to_string(),
                reason: "规则 ID 不能为空".to_string(),
            });
        }

        for (index, condition) in rule.conditions.iter().enumerate() {
            Self::validate_condition(&rule.id, index, condition)?;
        }

        Self::validate_action(&rule.id, &rule.action)?;

        Ok(())
    }

    fn validate_condition(
        rule_id: &str,
        index: usize,
        condition: &Condition,
    ) -> Result<(), ConfigError> {
        if condition.value.is_null() {
            return Err(ConfigError::InvalidCondition {
                rule_id: rule_id.to_string(),
                index,
                reason: "条件值不能为 null".to_string(),
            });
        }

        // 数值比较的期望值必须在加载阶段就能解析为数值，
        // 评估阶段的 InvalidOperand 只会来自商品侧的字段值
        if matches!(
            condition.operator,
            Operator::GreaterThan | Operator::LessThan
        ) && !Self::is_numeric(&condition.value)
        {
            return Err(ConfigError::InvalidCondition {
                rule_id: rule_id.to_string(),
                index,
                reason: format!(
                    "{} 操作符需要数值类型的期望值，当前为 {}",
                    condition.operator, condition.value
                ),
            });
        }

        Ok(())
    }

    fn validate_action(rule_id: &str, action: &Action) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidAction {
            rule_id: rule_id.to_string(),
            reason,
        };

        match action {
            Action::FixedPrice { value } => {
                if !value.is_finite() || *value < 0.0 {
                    return Err(invalid(format!("fixed_price 的价格无效: {}", value)));
                }
            }
            Action::PercentageAdjustment { value } | Action::FixedAdjustment { value } => {
                if !value.is_finite() {
                    return Err(invalid(format!("调整幅度无效: {}", value)));
                }
            }
            Action::MatchCompetitor {
                competitor,
                offset_percentage,
            } => {
                if competitor.is_empty() {
                    return Err(invalid("match_competitor 的竞争对手名称不能为空".to_string()));
                }
                if !offset_percentage.is_finite() {
                    return Err(invalid(format!("偏移百分比无效: {}", offset_percentage)));
                }
            }
            Action::InventoryBased {
                threshold,
                low_adjustment,
                high_adjustment,
            } => {
                if *threshold < 0 {
                    return Err(invalid(format!(
                        "inventory_based 的库存阈值不能为负: {}",
                        threshold
                    )));
                }
                if !low_adjustment.is_finite() || !high_adjustment.is_finite() {
                    return Err(invalid("inventory_based 的调整幅度无效".to_string()));
                }
            }
        }

        Ok(())
    }

    fn validate_settings(rule_set: &RuleSet) -> Result<(), ConfigError> {
        let settings = &rule_set.global_settings;

        if !settings.min_price.is_finite() || settings.min_price < 0.0 {
            return Err(ConfigError::InvalidSettings(format!(
                "min_price 无效: {}",
                settings.min_price
            )));
        }

        if !settings.max_price.is_finite() || settings.max_price < settings.min_price {
            return Err(ConfigError::InvalidSettings(format!(
                "max_price ({}) 必须不小于 min_price ({})",
                settings.max_price, settings.min_price
            )));
        }

        if !settings.max_change_percent.is_finite() || settings.max_change_percent < 0.0 {
            return Err(ConfigError::InvalidSettings(format!(
                "max_change_percent 无效: {}",
                settings.max_change_percent
            )));
        }

        Ok(())
    }

    /// 数值或可解析为数值的字符串
    fn is_numeric(value: &Value) -> bool {
        match value {
            Value::Number(_) => true,
            Value::String(s) => s.parse::<f64>().is_ok(),
            _ => false,
        }
    }
}
