//! 条件字段与操作符定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 条件字段
///
/// 规则条件只能引用固定的字段集合，新增字段需要显式扩展此枚举，
/// 由编译器保证所有匹配分支完整。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    ProductType,
    Vendor,
    Tags,
    /// 商品数据中无法直接解析出集合归属，该字段的条件永远按缺失处理
    CollectionId,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ProductType => "product_type",
            Self::Vendor => "vendor",
            Self::Tags => "tags",
            Self::CollectionId => "collection_id",
        };
        write!(f, "{}", s)
    }
}

/// 条件操作符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    // 通用比较
    Equals,
    NotEquals,

    // 包含检查
    Contains,
    NotContains,

    // 数值比较
    GreaterThan,
    LessThan,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::Contains => "contains",
            Self::NotContains => "not_contains",
            Self::GreaterThan => "greater_than",
            Self::LessThan => "less_than",
        };
        write!(f, "{}", s)
    }
}
