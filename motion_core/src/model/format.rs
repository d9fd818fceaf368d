use serde::{Deserialize, Serialize};

use crate::Clip;

/// `<format>` 声明的画面参数，按 ID 被片段和工程引用。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Format {
    pub width: u32,
    pub height: u32,
    /// 单帧时长（秒）。
    pub frame_duration: Option<f64>,
}

/// 复合片段的模板：一段可被 `ref-clip` 重复引用的子时间线。
///
/// 其中片段的 `offset` 相对于定义自身的时间原点，尚未放置到主时间线上。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaDefinition {
    pub id: String,
    pub clips: Vec<Clip>,
}

impl MediaDefinition {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            clips: Vec::new(),
        }
    }
}
