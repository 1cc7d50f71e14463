//! 安全边界
//!
//! 把候选价格收拢到全局设置允许的范围内：先做绝对区间裁剪，
//! 再限制相对当前价的最大变动幅度，最后保留两位小数。
//! 纯函数，可独立于引擎其余部分测试。

use crate::models::GlobalSettings;

/// 安全边界
pub struct SafetyBounds;

impl SafetyBounds {
    /// 裁剪候选价格
    ///
    /// 调整顺序固定：绝对区间 -> 相对变动幅度 -> 两位小数取整。
    /// 越界修正是静默行为，不产生错误。
    pub fn clamp(candidate: f64, current_price: f64, settings: &GlobalSettings) -> f64 {
        let mut price = candidate;

        // 绝对区间裁剪
        price = price.max(settings.min_price);
        price = price.min(settings.max_price);

        // 相对当前价的最大变动幅度
        let max_allowed_change = current_price * (settings.max_change_percent / 100.0);
        if (price - current_price).abs() > max_allowed_change {
            if price > current_price {
                price = current_price + max_allowed_change;
            } else {
                price = current_price - max_allowed_change;
            }
        }

        round_to_cents(price)
    }
}

/// 保留两位小数
pub fn round_to_cents(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}
