//! 动态定价规则引擎
//!
//! 提供纯计算的价格决策能力，支持：
//! - JSON 规则定义、加载与一次性校验
//! - 多条件（AND 组合）、多动作、按优先级排序的规则应用
//! - 全局安全边界（绝对区间 + 最大变动幅度）
//! - 相互独立的批量评估与汇总统计
//!
//! 引擎不获取数据、不持久化结果、不重试网络操作，
//! 这些职责属于外部协作组件。

pub mod applicator;
pub mod batch;
pub mod bounds;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod loader;
pub mod matcher;
pub mod models;
pub mod operators;

pub use applicator::{ActionApplicator, Candidate};
pub use batch::{
    BatchReport, BatchSummary, OutcomeStatus, PricingSnapshot, ProductRecord, VariantOutcome,
    run_batch,
};
pub use bounds::{SafetyBounds, round_to_cents};
pub use engine::PricingEngine;
pub use error::{ConfigError, EvaluationError};
pub use evaluator::{ConditionEvaluator, FieldValue};
pub use loader::RuleSetLoader;
pub use matcher::{MatchOutcome, RuleMatcher};
pub use models::{
    Action, CompetitorPrice, Condition, GlobalSettings, InventoryLevels, PriceDecision, Product,
    Rule, RuleSet, Variant,
};
pub use operators::{Field, Operator};
