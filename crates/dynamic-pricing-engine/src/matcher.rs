//! 规则匹配器
//!
//! 从规则集中筛选出适用于某个商品的规则，并按优先级升序排列。

use crate::evaluator::{ConditionEvaluator, FieldValue};
use crate::models::{Product, Rule, RuleSet};
use crate::operators::Field;
use tracing::warn;

/// 匹配结果
///
/// 除匹配到的规则外，还携带评估过程中被恢复的错误告警，
/// 供上层写入单个变体的处理结果。
#[derive(Debug, Default)]
pub struct MatchOutcome<'a> {
    pub rules: Vec<&'a Rule>,
    pub warnings: Vec<String>,
}

/// 规则匹配器
pub struct RuleMatcher<'a> {
    rule_set: &'a RuleSet,
}

impl<'a> RuleMatcher<'a> {
    pub fn new(rule_set: &'a RuleSet) -> Self {
        Self { rule_set }
    }

    /// 筛选适用于商品的规则
    ///
    /// 规则的所有条件都满足时才入选。条件求值出错时该条件视为不满足，
    /// 记录告警后继续处理，不中断批次。返回结果按优先级升序排列，
    /// 相同优先级保持规则定义顺序（稳定排序）。
    pub fn applicable_rules(&self, product: &Product) -> MatchOutcome<'a> {
        let mut outcome = MatchOutcome::default();

        for rule in &self.rule_set.rules {
            let mut conditions_met = true;

            for condition in &rule.conditions {
                let field_value = Self::extract_field(product, condition.field);

                let matched = match ConditionEvaluator::evaluate(
                    field_value.as_ref(),
                    condition.operator,
                    &condition.value,
                ) {
                    Ok(matched) => matched,
                    Err(e) => {
                        warn!(
                            rule_id = %rule.id,
                            product_id = product.id,
                            field = %condition.field,
                            "条件求值失败，按不满足处理: {}", e
                        );
                        outcome
                            .warnings
                            .push(format!("规则 '{}': {}", rule.id, e));
                        false
                    }
                };

                if !matched {
                    conditions_met = false;
                    break;
                }
            }

            if conditions_met {
                outcome.rules.push(rule);
            }
        }

        // Vec::sort_by_key 是稳定排序，优先级相同的规则保持定义顺序
        outcome.rules.sort_by_key(|r| r.priority);

        outcome
    }

    /// 按封闭的字段枚举从商品数据中提取字段值
    fn extract_field(product: &Product, field: Field) -> Option<FieldValue<'_>> {
        match field {
            Field::ProductType => product.product_type.as_deref().map(FieldValue::Text),
            Field::Vendor => product.vendor.as_deref().map(FieldValue::Text),
            Field::Tags => Some(FieldValue::Tags(&product.tags)),
            // 商品数据中无法解析出集合归属，按缺失处理
            Field::CollectionId => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Action, Condition, GlobalSettings};
    use crate::operators::Operator;
    use serde_json::json;

    fn product() -> Product {
        Product {
            id: 42,
            product_type: Some("Rings".to_string()),
            vendor: Some("Acme".to_string()),
            tags: vec!["sale".to_string(), "gold".to_string()],
        }
    }

    fn rule(id: &str, priority: i32, conditions: Vec<Condition>) -> Rule {
        Rule {
            id: id.to_string(),
            priority,
            conditions,
            action: Action::FixedPrice { value: 10.0 },
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_all_conditions_required() {
        let rule_set = RuleSet::new(
            vec![rule(
                "r1",
                1,
                vec![
                    Condition::new(Field::ProductType, Operator::Equals, "Rings"),
                    Condition::new(Field::Vendor, Operator::Equals, "Other"),
                ],
            )],
            GlobalSettings::default(),
        );

        let matcher = RuleMatcher::new(&rule_set);
        let outcome = matcher.applicable_rules(&product());
        assert!(outcome.rules.is_empty());
    }

    #[test]
    fn test_match_and_priority_order() {
        let rule_set = RuleSet::new(
            vec![
                rule(
                    "low-priority",
                    10,
                    vec![Condition::new(Field::Tags, Operator::Contains, "sale")],
                ),
                rule(
                    "high-priority",
                    1,
                    vec![Condition::new(Field::Vendor, Operator::Equals, "Acme")],
                ),
            ],
            GlobalSettings::default(),
        );

        let matcher = RuleMatcher::new(&rule_set);
        let outcome = matcher.applicable_rules(&product());
        assert_eq!(outcome.rules.len(), 2);
        assert_eq!(outcome.rules[0].id, "high-priority");
        assert_eq!(outcome.rules[1].id, "low-priority");
    }

    #[test]
    fn test_stable_order_on_priority_ties() {
        let rule_set = RuleSet::new(
            vec![
                rule("first", 5, vec![]),
                rule("second", 5, vec![]),
                rule("third", 5, vec![]),
            ],
            GlobalSettings::default(),
        );

        let matcher = RuleMatcher::new(&rule_set);
        let outcome = matcher.applicable_rules(&product());
        let ids: Vec<_> = outcome.rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_collection_id_never_matches() {
        let rule_set = RuleSet::new(
            vec![rule(
                "r1",
                1,
                vec![Condition::new(Field::CollectionId, Operator::Equals, "123")],
            )],
            GlobalSettings::default(),
        );

        let matcher = RuleMatcher::new(&rule_set);
        assert!(matcher.applicable_rules(&product()).rules.is_empty());
    }

    #[test]
    fn test_missing_vendor_fails_not_equals() {
        // fail-closed：vendor 缺失时 not_equals 也不成立
        let rule_set = RuleSet::new(
            vec![rule(
                "r1",
                1,
                vec![Condition::new(Field::Vendor, Operator::NotEquals, "Acme")],
            )],
            GlobalSettings::default(),
        );

        let no_vendor = Product {
            id: 7,
            product_type: None,
            vendor: None,
            tags: vec![],
        };

        let matcher = RuleMatcher::new(&rule_set);
        assert!(matcher.applicable_rules(&no_vendor).rules.is_empty());
    }

    #[test]
    fn test_evaluation_error_recorded_as_warning() {
        let rule_set = RuleSet::new(
            vec![rule(
                "numeric-rule",
                1,
                vec![Condition::new(
                    Field::ProductType,
                    Operator::GreaterThan,
                    json!(100),
                )],
            )],
            GlobalSettings::default(),
        );

        let matcher = RuleMatcher::new(&rule_set);
        let outcome = matcher.applicable_rules(&product());
        assert!(outcome.rules.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("numeric-rule"));
    }

    #[test]
    fn test_empty_conditions_always_applies() {
        let rule_set = RuleSet::new(vec![rule("r1", 1, vec![])], GlobalSettings::default());
        let matcher = RuleMatcher::new(&rule_set);
        assert_eq!(matcher.applicable_rules(&product()).rules.len(), 1);
    }
}
