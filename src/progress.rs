//! 读取进度的百分比计算与回调采样。

use crate::options::ProgressCallback;

/// 计算 `size` 占 `total` 的百分比（向下取整）。
///
/// `total` 为 0 时返回 0。`size` 大于 `total` 时结果可超过 100。
pub fn percent_of(size: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    let percent = u128::from(size) * 100 / u128::from(total);
    u64::try_from(percent).unwrap_or(u64::MAX)
}

/// Invokes the callback whenever a percent lands on a multiple of the step.
///
/// Samples are neither monotonic nor deduplicated: small reads can report 0
/// repeatedly and a rewind can report 100 before a later 0.
pub(crate) struct ProgressSampler {
    callback: Option<ProgressCallback>,
    step: u64,
}

impl ProgressSampler {
    pub(crate) fn new(callback: Option<ProgressCallback>, step: u32) -> Self {
        Self {
            callback,
            step: u64::from(step.max(1)),
        }
    }

    pub(crate) fn step(&self) -> u64 {
        self.step
    }

    /// 返回回调是否被触发。
    pub(crate) fn sample(&mut self, percent: u64) -> bool {
        match self.callback.as_mut() {
            Some(callback) if percent % self.step == 0 => {
                callback(percent);
                true
            }
            _ => false,
        }
    }
}
