use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// FCPXML 解析选项
///
/// 在文档中出现任何 `<format>` 或 `<sequence>` 之前，工程使用这些默认值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FcpxmlParsingOptions {
    /// 默认画面宽度（像素）。
    pub default_width: u32,
    /// 默认画面高度（像素）。
    pub default_height: u32,
    /// 默认帧率。
    pub default_frame_rate: f64,
    /// 默认工程时长（秒）。
    pub default_duration: f64,
}

impl Default for FcpxmlParsingOptions {
    fn default() -> Self {
        Self {
            default_width: 1920,
            default_height: 1080,
            default_frame_rate: 30.0,
            default_duration: 10.0,
        }
    }
}

/// Motion 工程生成选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct MotionGenerationOptions {
    /// 是否输出带缩进的 XML。
    pub format: bool,
    /// 素材（footage）节点 ID 的起始值。
    pub asset_id_base: u32,
    /// 片段节点（group / scenenode / audioTrack）ID 的起始值。
    pub clip_id_base: u32,
}

impl Default for MotionGenerationOptions {
    fn default() -> Self {
        Self {
            format: true,
            asset_id_base: 10_000,
            clip_id_base: 11_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_options_builder() {
        let options = MotionGenerationOptionsBuilder::default()
            .format(false)
            .clip_id_base(20_000u32)
            .build()
            .unwrap();
        assert!(!options.format);
        assert_eq!(options.asset_id_base, 10_000);
        assert_eq!(options.clip_id_base, 20_000);
    }

    #[test]
    fn test_partial_options_deserialize_with_defaults() {
        let options: MotionGenerationOptions = toml::from_str("format = false").unwrap();
        assert!(!options.format);
        assert_eq!(options.clip_id_base, 11_000);

        let parsing: FcpxmlParsingOptions = toml::from_str("default_width = 3840").unwrap();
        assert_eq!(parsing.default_width, 3840);
        assert_eq!(parsing.default_height, 1080);
    }
}
