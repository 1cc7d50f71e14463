//! 配置管理模块
//!
//! 支持多层配置文件加载与环境变量覆盖，提供类型安全的配置访问。

use crate::observability::ObservabilityConfig;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// 定价运行配置
///
/// 规则与市场快照都是本地 JSON 文件，由外部采集组件产出；
/// 引擎只读取，不拉取远端数据。
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// 规则集文件路径
    #[serde(default = "default_rules_path")]
    pub rules_path: String,
    /// 市场快照文件路径（商品、库存、竞争对手价格）
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
}

fn default_rules_path() -> String {
    "rules.json".to_string()
}

fn default_snapshot_path() -> String {
    "snapshot.json".to_string()
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            rules_path: default_rules_path(),
            snapshot_path: default_snapshot_path(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. config/default.toml（默认配置）
    /// 2. config/{environment}.toml（环境特定配置）
    /// 3. config/{service_name}.toml（服务特定配置）
    /// 4. 环境变量（PRICING_ 前缀，层级用双下划线分隔，
    ///    如 PRICING_PRICING__RULES_PATH -> pricing.rules_path）
    pub fn load(service_name: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("PRICING_ENV").unwrap_or_else(|_| "development".to_string());

        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        let builder = Config::builder()
            // 默认配置
            .set_default("service_name", service_name)?
            .set_default("environment", env.clone())?
            // 加载默认配置文件
            .add_source(File::from(Path::new(&config_dir).join("default.toml")).required(false))
            // 加载环境特定配置
            .add_source(
                File::from(Path::new(&config_dir).join(format!("{}.toml", env))).required(false),
            )
            // 加载服务特定配置
            .add_source(
                File::from(Path::new(&config_dir).join(format!("{}.toml", service_name)))
                    .required(false),
            )
            // 环境变量覆盖；单下划线保留给字段名本身（如 rules_path），
            // 层级用双下划线分隔
            .add_source(
                Environment::with_prefix("PRICING")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }
}
