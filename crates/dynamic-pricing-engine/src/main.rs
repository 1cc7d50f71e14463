//! 定价引擎单次运行入口
//!
//! 从本地 JSON 文件加载规则集与市场快照，执行一次批量定价，
//! 把汇总统计写入日志、把逐变体结果以 JSON 输出到标准输出。
//! 不做任何网络 I/O，不做调度；定时触发由外部系统负责。

use anyhow::{Context, Result};
use pricing_engine::{PricingEngine, PricingSnapshot, RuleSetLoader, run_batch};
use pricing_shared::config::AppConfig;
use pricing_shared::observability;
use tracing::info;

fn main() -> Result<()> {
    // 统一加载配置：从 config/{service_name}.toml 加载，包含可观测性配置
    let config = AppConfig::load("pricing-engine").unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });

    let obs_config = config
        .observability
        .clone()
        .with_service_name(&config.service_name);
    observability::init(&obs_config)?;

    info!("Starting pricing-engine run...");

    // 规则集加载失败是致命错误，引擎不会以残缺配置启动
    let rule_set = RuleSetLoader::load_from_path(&config.pricing.rules_path)
        .with_context(|| format!("加载规则集失败: {}", config.pricing.rules_path))?;
    info!(
        rule_count = rule_set.rules.len(),
        path = %config.pricing.rules_path,
        "Rule set loaded"
    );

    let snapshot = PricingSnapshot::load_from_path(&config.pricing.snapshot_path)
        .with_context(|| format!("加载市场快照失败: {}", config.pricing.snapshot_path))?;
    info!(
        product_count = snapshot.products.len(),
        path = %config.pricing.snapshot_path,
        "Market snapshot loaded"
    );

    let engine = PricingEngine::new(rule_set);
    let report = run_batch(&engine, &snapshot);

    // 逐变体结果交给下游（如价格推送组件）消费
    serde_json::to_writer_pretty(std::io::stdout().lock(), &report)?;
    println!();

    Ok(())
}
