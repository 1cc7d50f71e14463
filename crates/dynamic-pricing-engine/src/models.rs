//! 定价引擎领域模型

use crate::operators::{Field, Operator};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// 定价规则
///
/// 一条规则由若干条件和一个动作组成。所有条件以 AND 方式组合，
/// 全部满足时规则才会生效。规则加载后不可变。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    /// 优先级，数值越小越先应用
    pub priority: i32,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    pub action: Action,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Rule {
    pub fn new(priority: i32, conditions: Vec<Condition>, action: Action) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            priority,
            conditions,
            action,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

/// 规则条件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub field: Field,
    pub operator: Operator,
    pub value: Value,
}

impl Condition {
    pub fn new(field: Field, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            field,
            operator,
            value: value.into(),
        }
    }
}

/// 定价动作
///
/// 封闭的标签联合类型，未知的 type 在反序列化阶段即失败，
/// 新增动作类型时由编译器强制补全所有匹配分支。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// 直接设定为固定价格
    FixedPrice { value: f64 },
    /// 在当前候选价基础上按百分比调整
    PercentageAdjustment { value: f64 },
    /// 在当前候选价基础上加减固定金额
    FixedAdjustment { value: f64 },
    /// 跟随指定竞争对手的价格，附加偏移百分比
    MatchCompetitor {
        competitor: String,
        #[serde(default)]
        offset_percentage: f64,
    },
    /// 按库存水位调价：低于等于阈值用 low_adjustment，否则用 high_adjustment
    InventoryBased {
        threshold: i64,
        #[serde(default)]
        low_adjustment: f64,
        #[serde(default)]
        high_adjustment: f64,
    },
}

/// 全局安全设置
///
/// 约束最终价格的绝对区间和相对当前价的最大变动幅度。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalSettings {
    #[serde(default)]
    pub min_price: f64,
    #[serde(default = "default_max_price")]
    pub max_price: f64,
    #[serde(default = "default_max_change_percent")]
    pub max_change_percent: f64,
}

fn default_max_price() -> f64 {
    9_999_999.0
}

fn default_max_change_percent() -> f64 {
    20.0
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            min_price: 0.0,
            max_price: default_max_price(),
            max_change_percent: default_max_change_percent(),
        }
    }
}

/// 规则集
///
/// 一次加载、整体校验，加载完成后在引擎生命周期内只读。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub global_settings: GlobalSettings,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>, global_settings: GlobalSettings) -> Self {
        Self {
            rules,
            global_settings,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// 商品数据（只读输入）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// 商品变体（只读输入）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    pub id: i64,
    /// 当前售价
    pub price: f64,
    #[serde(default)]
    pub inventory_item_id: Option<i64>,
}

/// 竞争对手价格观测值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorPrice {
    pub competitor: String,
    pub price: f64,
}

impl CompetitorPrice {
    pub fn new(competitor: impl Into<String>, price: f64) -> Self {
        Self {
            competitor: competitor.into(),
            price,
        }
    }
}

/// 库存水位表
///
/// 以 inventory_item_id 为键。未知条目视为库存 0。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryLevels(pub HashMap<i64, i64>);

impl InventoryLevels {
    pub fn new(levels: HashMap<i64, i64>) -> Self {
        Self(levels)
    }

    /// 查询可用库存，缺失条目返回 0
    pub fn available(&self, inventory_item_id: Option<i64>) -> i64 {
        inventory_item_id
            .and_then(|id| self.0.get(&id).copied())
            .unwrap_or(0)
    }
}

/// 单个变体的定价决策
#[derive(Debug, Clone, Serialize)]
pub struct PriceDecision {
    pub price: f64,
    pub changed: bool,
    /// 评估过程中被恢复的错误（如数值比较的无效操作数）
    pub warnings: Vec<String>,
}

impl PriceDecision {
    pub fn unchanged(price: f64) -> Self {
        Self {
            price,
            changed: false,
            warnings: Vec::new(),
        }
    }
}
