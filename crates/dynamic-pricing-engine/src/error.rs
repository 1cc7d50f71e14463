//! 定价引擎错误类型

use thiserror::Error;

/// 规则配置错误
///
/// 配置错误在规则集加载阶段产生，属于致命错误：
/// 加载失败时不会产出部分可用的规则集，引擎不会启动。
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("规则配置解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("规则配置读取失败: {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("规则 '{rule_id}' 无效: {reason}")]
    InvalidRule { rule_id: String, reason: String },

    #[error("规则 '{rule_id}' 的条件 [{index}] 无效: {reason}")]
    InvalidCondition {
        rule_id: String,
        index: usize,
        reason: String,
    },

    #[error("规则 '{rule_id}' 的动作无效: {reason}")]
    InvalidAction { rule_id: String, reason: String },

    #[error("全局设置无效: {0}")]
    InvalidSettings(String),
}

/// 单次评估错误
///
/// 评估错误在条件求值阶段产生，属于可恢复错误：
/// 调用方将该条件视为不满足并记录告警，继续处理批次中的其余商品。
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("无效的数值操作数: {operator} 无法将 '{operand}' 解析为数值")]
    InvalidOperand { operator: String, operand: String },
}
