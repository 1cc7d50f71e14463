//! 条件评估器
//!
//! 针对单个条件执行字段值与期望值的比较。字段缺失时一律返回 false
//! （fail-closed 策略），包括 not_equals 和 not_contains：缺失的字段
//! 永远不能使条件成立。

use crate::error::EvaluationError;
use crate::operators::Operator;
use serde_json::Value;

/// 从商品上提取出的字段值
///
/// 字段要么是单个文本（product_type / vendor），要么是标签序列（tags）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Tags(&'a [String]),
}

/// 条件评估器
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// 评估条件
    ///
    /// # Arguments
    /// * `field_value` - 从商品数据中提取的字段值，None 表示字段缺失
    /// * `operator` - 操作符
    /// * `expected` - 规则条件中定义的期望值
    ///
    /// 数值比较遇到无法解析为数值的操作数时返回 `InvalidOperand`，
    /// 调用方将该条件视为不满足并记录告警，不中断批次处理。
    pub fn evaluate(
        field_value: Option<&FieldValue<'_>>,
        operator: Operator,
        expected: &Value,
    ) -> Result<bool, EvaluationError> {
        // 字段缺失时所有操作符都不满足
        let field_value = match field_value {
            Some(v) => v,
            None => return Ok(false),
        };

        match operator {
            Operator::Equals => Ok(Self::eq(field_value, expected)),
            Operator::NotEquals => Ok(!Self::eq(field_value, expected)),
            Operator::Contains => Ok(Self::contains(field_value, expected)),
            Operator::NotContains => Ok(!Self::contains(field_value, expected)),
            Operator::GreaterThan => Self::compare(field_value, operator, expected, |a, b| a > b),
            Operator::LessThan => Self::compare(field_value, operator, expected, |a, b| a < b),
        }
    }

    /// 相等比较
    ///
    /// 按原始值直接比较，不做数值转换：文本 "100" 与数值 100 不相等。
    /// 需要数值语义的规则应使用 greater_than / less_than。
    fn eq(field: &FieldValue<'_>, expected: &Value) -> bool {
        match field {
            FieldValue::Text(s) => expected.as_str() == Some(*s),
            FieldValue::Tags(tags) => match expected {
                // 标签序列只与字符串数组整体相等
                Value::Array(arr) => {
                    arr.len() == tags.len()
                        && arr
                            .iter()
                            .zip(tags.iter())
                            .all(|(a, b)| a.as_str() == Some(b.as_str()))
                }
                _ => false,
            },
        }
    }

    /// 包含检查：标签序列做成员测试，文本做子串测试
    fn contains(field: &FieldValue<'_>, expected: &Value) -> bool {
        let needle = Self::as_text(expected);
        match field {
            FieldValue::Text(s) => s.contains(needle.as_ref()),
            FieldValue::Tags(tags) => tags.iter().any(|t| t.as_str() == needle.as_ref()),
        }
    }

    /// 数值比较
    fn compare<F>(
        field: &FieldValue<'_>,
        operator: Operator,
        expected: &Value,
        cmp: F,
    ) -> Result<bool, EvaluationError>
    where
        F: Fn(f64, f64) -> bool,
    {
        let field_num = match field {
            FieldValue::Text(s) => s.parse::<f64>().ok(),
            // 标签序列无法参与数值比较
            FieldValue::Tags(_) => None,
        }
        .ok_or_else(|| EvaluationError::InvalidOperand {
            operator: operator.to_string(),
            operand: Self::describe(field),
        })?;

        let expected_num =
            Self::as_f64(expected).ok_or_else(|| EvaluationError::InvalidOperand {
                operator: operator.to_string(),
                operand: expected.to_string(),
            })?;

        Ok(cmp(field_num, expected_num))
    }

    /// 尝试将期望值转换为 f64（数值或数值字符串）
    fn as_f64(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// 期望值的文本形式，用于包含检查
    fn as_text(value: &Value) -> std::borrow::Cow<'_, str> {
        match value {
            Value::String(s) => std::borrow::Cow::Borrowed(s),
            other => std::borrow::Cow::Owned(other.to_string()),
        }
    }

    fn describe(field: &FieldValue<'_>) -> String {
        match field {
            FieldValue::Text(s) => (*s).to_string(),
            FieldValue::Tags(tags) => format!("[{}]", tags.join(", ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_equals_strings() {
        let field = FieldValue::Text("Rings");
        assert!(
            ConditionEvaluator::evaluate(Some(&field), Operator::Equals, &json!("Rings")).unwrap()
        );
        assert!(
            !ConditionEvaluator::evaluate(Some(&field), Operator::Equals, &json!("Necklaces"))
                .unwrap()
        );
    }

    #[test]
    fn test_equals_is_direct_value_comparison() {
        // 相等比较不做数值转换：文本 "100" 与数值 100 是不同的值
        let field = FieldValue::Text("100");
        assert!(
            !ConditionEvaluator::evaluate(Some(&field), Operator::Equals, &json!(100)).unwrap()
        );
        assert!(
            !ConditionEvaluator::evaluate(Some(&field), Operator::Equals, &json!(100.0)).unwrap()
        );
        assert!(
            ConditionEvaluator::evaluate(Some(&field), Operator::Equals, &json!("100")).unwrap()
        );
        // not_equals 是相等比较的取反，同样不做数值转换
        assert!(
            ConditionEvaluator::evaluate(Some(&field), Operator::NotEquals, &json!(100)).unwrap()
        );
    }

    #[test]
    fn test_not_equals() {
        let field = FieldValue::Text("Acme");
        assert!(
            !ConditionEvaluator::evaluate(Some(&field), Operator::NotEquals, &json!("Acme"))
                .unwrap()
        );
        assert!(
            ConditionEvaluator::evaluate(Some(&field), Operator::NotEquals, &json!("Other"))
                .unwrap()
        );
    }

    #[test]
    fn test_missing_field_fails_closed() {
        // 字段缺失时所有操作符都返回 false，包括 not_equals / not_contains
        for op in [
            Operator::Equals,
            Operator::NotEquals,
            Operator::Contains,
            Operator::NotContains,
            Operator::GreaterThan,
            Operator::LessThan,
        ] {
            assert!(!ConditionEvaluator::evaluate(None, op, &json!("Acme")).unwrap());
        }
    }

    #[test]
    fn test_contains_tags_membership() {
        let tags = vec!["sale".to_string(), "clearance".to_string()];
        let field = FieldValue::Tags(&tags);
        assert!(
            ConditionEvaluator::evaluate(Some(&field), Operator::Contains, &json!("sale")).unwrap()
        );
        assert!(
            !ConditionEvaluator::evaluate(Some(&field), Operator::Contains, &json!("new"))
                .unwrap()
        );
    }

    #[test]
    fn test_contains_substring() {
        let field = FieldValue::Text("Gold Rings");
        assert!(
            ConditionEvaluator::evaluate(Some(&field), Operator::Contains, &json!("Gold")).unwrap()
        );
        assert!(
            !ConditionEvaluator::evaluate(Some(&field), Operator::Contains, &json!("Silver"))
                .unwrap()
        );
    }

    #[test]
    fn test_not_contains() {
        let tags = vec!["sale".to_string()];
        let field = FieldValue::Tags(&tags);
        assert!(
            ConditionEvaluator::evaluate(Some(&field), Operator::NotContains, &json!("new"))
                .unwrap()
        );
        assert!(
            !ConditionEvaluator::evaluate(Some(&field), Operator::NotContains, &json!("sale"))
                .unwrap()
        );
    }

    #[test]
    fn test_numeric_comparisons() {
        let field = FieldValue::Text("150");
        assert!(
            ConditionEvaluator::evaluate(Some(&field), Operator::GreaterThan, &json!(100))
                .unwrap()
        );
        assert!(
            !ConditionEvaluator::evaluate(Some(&field), Operator::LessThan, &json!(100)).unwrap()
        );
        // 期望值为数值字符串同样可比较
        assert!(
            ConditionEvaluator::evaluate(Some(&field), Operator::LessThan, &json!("200")).unwrap()
        );
    }

    #[test]
    fn test_invalid_operand_on_field() {
        let field = FieldValue::Text("not-a-number");
        let result =
            ConditionEvaluator::evaluate(Some(&field), Operator::GreaterThan, &json!(100));
        assert!(matches!(
            result,
            Err(EvaluationError::InvalidOperand { .. })
        ));
    }

    #[test]
    fn test_invalid_operand_on_tags() {
        let tags = vec!["sale".to_string()];
        let field = FieldValue::Tags(&tags);
        let result = ConditionEvaluator::evaluate(Some(&field), Operator::LessThan, &json!(100));
        assert!(result.is_err());
    }

    #[test]
    fn test_tags_whole_sequence_equality() {
        let tags = vec!["a".to_string(), "b".to_string()];
        let field = FieldValue::Tags(&tags);
        assert!(
            ConditionEvaluator::evaluate(Some(&field), Operator::Equals, &json!(["a", "b"]))
                .unwrap()
        );
        assert!(
            !ConditionEvaluator::evaluate(Some(&field), Operator::Equals, &json!(["b", "a"]))
                .unwrap()
        );
        assert!(
            !ConditionEvaluator::evaluate(Some(&field), Operator::Equals, &json!("a")).unwrap()
        );
    }
}
