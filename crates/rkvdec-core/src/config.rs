//! 运行配置.
//!
//! 调试输出级别和看门狗超时都通过 `VpuConfig` 在构造设备时显式传入.

use std::time::Duration;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// 调试输出位, 每一位控制一类日志
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DebugFlags: u32 {
        /// 全局信息: 模式, 尺寸, 初始化与释放
        const GLOBAL = 1 << 0;
        /// 每次运行的开始/结果
        const RUN = 1 << 1;
        /// 小型控制结构内容
        const SMALL_CTRLS = 1 << 2;
        /// 大型控制结构内容 (DPB, 参考列表)
        const BIG_CTRLS = 1 << 3;
        /// 格式, 缓冲区排队细节
        const FMT = 1 << 4;
        /// 函数进入/退出追踪
        const TRACE = 1 << 5;
        /// 寄存器读写
        const REGS = 1 << 6;
    }
}

// 配置文件中以原始位值表示
impl Serialize for DebugFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for DebugFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u32::deserialize(deserializer)?;
        Ok(DebugFlags::from_bits_truncate(bits))
    }
}

/// 设备运行配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpuConfig {
    /// 调试输出位
    #[serde(default)]
    pub debug: DebugFlags,
    /// 单帧硬件处理超时 (毫秒)
    #[serde(default = "default_watchdog_timeout_ms")]
    pub watchdog_timeout_ms: u64,
    /// 硬件变体名称
    #[serde(default = "default_variant")]
    pub variant: String,
}

fn default_watchdog_timeout_ms() -> u64 {
    2000
}

fn default_variant() -> String {
    "rk3399-vdec".to_string()
}

impl Default for VpuConfig {
    fn default() -> Self {
        Self {
            debug: DebugFlags::empty(),
            watchdog_timeout_ms: default_watchdog_timeout_ms(),
            variant: default_variant(),
        }
    }
}

impl VpuConfig {
    /// 看门狗超时
    pub fn watchdog_timeout(&self) -> Duration {
        Duration::from_millis(self.watchdog_timeout_ms)
    }

    /// 某一类调试输出是否打开
    pub fn debug_enabled(&self, flag: DebugFlags) -> bool {
        self.debug.contains(flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VpuConfig::default();
        assert_eq!(config.watchdog_timeout(), Duration::from_secs(2));
        assert!(config.debug.is_empty());
        assert_eq!(config.variant, "rk3399-vdec");
    }

    #[test]
    fn test_deserialize_partial_json() {
        let config: VpuConfig = serde_json::from_str(r#"{ "debug": 72 }"#).unwrap();
        assert!(config.debug_enabled(DebugFlags::BIG_CTRLS));
        assert!(config.debug_enabled(DebugFlags::REGS));
        assert!(!config.debug_enabled(DebugFlags::RUN));
        assert_eq!(config.watchdog_timeout_ms, 2000);
    }

    #[test]
    fn test_unknown_debug_bits_are_dropped() {
        let config: VpuConfig = serde_json::from_str(r#"{ "debug": 4294967295 }"#).unwrap();
        assert_eq!(config.debug, DebugFlags::all());
    }
}
