use std::path::Path;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::{ConversionWarning, FcpxmlParsingOptions};

/// 时间线上片段的种类，对应 FCPXML 中的元素名。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ClipKind {
    /// `<video>`
    Video,
    /// `<asset-clip>`
    AssetClip,
    /// `<title>`，带有文本内容
    Title,
    /// `<ref-clip>`，引用一个复合片段定义，解析结束前会被展开
    RefClip,
}

/// 一个可被引用的源媒体。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// 唯一的资源 ID
    pub id: String,
    /// 媒体位置（路径或 URL）
    pub src: String,
    /// 时间线使用的源媒体起点（秒）
    pub start: f64,
    /// 时间线使用的源媒体时长（秒）
    pub duration: f64,
    /// 像素宽度，缺失时使用工程宽度
    pub width: Option<u32>,
    /// 像素高度，缺失时使用工程高度
    pub height: Option<u32>,
}

impl Asset {
    /// 返回素材尺寸，缺失的一维由工程尺寸补齐。
    #[must_use]
    pub fn dimensions_or(&self, project: &Project) -> (u32, u32) {
        (
            self.width.filter(|w| *w > 0).unwrap_or(project.width),
            self.height.filter(|h| *h > 0).unwrap_or(project.height),
        )
    }
}

/// 放置在时间线上的片段。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub name: String,
    /// 指向 `Asset` 或 `MediaDefinition` 的 ID
    pub reference_id: String,
    /// 在主时间线上的绝对位置（秒）；在复合片段定义内部时相对于定义原点
    pub offset: f64,
    /// 时长（秒）
    pub duration: f64,
    /// 源媒体内的起点（秒）
    pub start: f64,
    /// 仅字幕片段有值
    pub text: Option<String>,
    pub kind: ClipKind,
    /// 层叠顺序，展开引用时累加
    pub lane: i32,
}

/// 解析完成后的完整工程，所有片段都已是绝对时间且不含 `ref-clip`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub assets: Vec<Asset>,
    pub clips: Vec<Clip>,
    pub frame_rate: f64,
    pub width: u32,
    pub height: u32,
    /// 工程时长（秒）
    pub duration: f64,
    /// 所有片段中最早的 `offset`。仅作参考，生成器不会据此平移时间线。
    pub start_time: f64,
}

impl Default for Project {
    fn default() -> Self {
        Self::with_options(&FcpxmlParsingOptions::default())
    }
}

impl Project {
    /// 以解析选项中的默认尺寸、帧率和时长创建一个空工程。
    #[must_use]
    pub fn with_options(options: &FcpxmlParsingOptions) -> Self {
        Self {
            assets: Vec::new(),
            clips: Vec::new(),
            frame_rate: options.default_frame_rate,
            width: options.default_width,
            height: options.default_height,
            duration: options.default_duration,
            start_time: 0.0,
        }
    }

    /// 为单个媒体文件构造工程：一个素材，加上一个覆盖它全长的视频片段。
    ///
    /// 用于输入不是 FCPXML 文档的情况。
    #[must_use]
    pub fn from_media_file(path: &Path, options: &FcpxmlParsingOptions) -> Self {
        const MEDIA_ID: &str = "1";

        let duration = options.default_duration;
        let name = path
            .file_name()
            .map_or_else(|| "Media".to_string(), |n| n.to_string_lossy().into_owned());

        let mut project = Self::with_options(options);
        project.assets.push(Asset {
            id: MEDIA_ID.to_string(),
            src: path.to_string_lossy().into_owned(),
            start: 0.0,
            duration,
            width: None,
            height: None,
        });
        project.clips.push(Clip {
            name,
            reference_id: MEDIA_ID.to_string(),
            offset: 0.0,
            duration,
            start: 0.0,
            text: None,
            kind: ClipKind::Video,
            lane: 0,
        });
        project
    }

    /// 按 ID 查找素材，ID 重复时取第一个。
    #[must_use]
    pub fn asset(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    /// 所有片段中最早的 `offset`，没有片段时为 0。
    #[must_use]
    pub fn earliest_offset(&self) -> f64 {
        self.clips
            .iter()
            .map(|c| c.offset)
            .min_by(f64::total_cmp)
            .unwrap_or(0.0)
    }
}

/// 解析的结果：工程本身，以及解析过程中记录的非致命问题。
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedProject {
    pub project: Project,
    pub warnings: Vec<ConversionWarning>,
}
