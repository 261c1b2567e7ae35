//! codec 实现注册表.
//!
//! 按编解码模式查找并创建硬件操作实例. 每个上下文在选定编码格式后
//! 创建一份实例, 流的整个生命周期内不变.

use std::collections::HashMap;

use rkvdec_core::{VpuError, VpuResult};

use crate::codec_mode::CodecMode;
use crate::codec_ops::CodecOps;
use crate::h264::H264Decoder;
use crate::variant::VpuVariant;

/// 工厂函数类型
pub type CodecOpsFactory = fn() -> Box<dyn CodecOps>;

/// 注册条目
struct CodecOpsEntry {
    name: String,
    factory: CodecOpsFactory,
}

/// codec 实现注册表
#[derive(Default)]
pub struct CodecOpsRegistry {
    entries: HashMap<CodecMode, Vec<CodecOpsEntry>>,
}

impl CodecOpsRegistry {
    /// 创建空的注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册一个实现
    pub fn register(&mut self, mode: CodecMode, name: impl Into<String>, factory: CodecOpsFactory) {
        self.entries.entry(mode).or_default().push(CodecOpsEntry {
            name: name.into(),
            factory,
        });
    }

    /// 创建指定模式的实例, 使用最先注册的实现
    pub fn create(&self, mode: CodecMode) -> VpuResult<Box<dyn CodecOps>> {
        let entry = self
            .entries
            .get(&mode)
            .and_then(|entries| entries.first())
            .ok_or_else(|| VpuError::Unsupported(format!("没有 {} 模式的实现", mode)))?;
        Ok((entry.factory)())
    }

    /// 已注册的 (模式, 名称)
    pub fn list(&self) -> Vec<(CodecMode, &str)> {
        let mut result: Vec<_> = self
            .entries
            .iter()
            .flat_map(|(mode, entries)| entries.iter().map(move |e| (*mode, e.name.as_str())))
            .collect();
        result.sort_by_key(|(mode, _)| mode.name());
        result
    }
}

fn create_h264_decoder() -> Box<dyn CodecOps> {
    Box::new(H264Decoder::new())
}

/// 注册变体支持的全部实现
pub fn register_variant(registry: &mut CodecOpsRegistry, variant: &VpuVariant) {
    for &mode in variant.modes {
        match mode {
            CodecMode::H264Dec => registry.register(mode, "rk3399-vdec-h264", create_h264_decoder),
            CodecMode::None | CodecMode::JpegEnc => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::RK3399_VDEC_VARIANT;

    #[test]
    fn test_create_registered_mode() {
        let mut reg = CodecOpsRegistry::new();
        register_variant(&mut reg, &RK3399_VDEC_VARIANT);
        let ops = reg.create(CodecMode::H264Dec).unwrap();
        assert_eq!(ops.mode(), CodecMode::H264Dec);
        assert_eq!(reg.list(), vec![(CodecMode::H264Dec, "rk3399-vdec-h264")]);
    }

    #[test]
    fn test_unregistered_mode_is_unsupported() {
        let mut reg = CodecOpsRegistry::new();
        register_variant(&mut reg, &RK3399_VDEC_VARIANT);
        assert!(matches!(
            reg.create(CodecMode::JpegEnc),
            Err(VpuError::Unsupported(_))
        ));
    }
}
