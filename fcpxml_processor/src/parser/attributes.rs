//! # FCPXML 解析器 - 元素属性
//!
//! 每种关心的元素都有一个强类型的属性记录，在解析边界上完成读取和校验。
//! 缺失的可选属性按下表取默认值：
//!
//! | 元素 | 属性 | 默认值 | 是否记录警告 |
//! |---|---|---|---|
//! | 片段 | `name` | `"Untitled"` | 否 |
//! | 片段 | `ref` | `""` | 否 |
//! | 片段 | `offset` / `duration` | `0s` | 是 |
//! | 片段 | `start` | `0s` | 否 |
//! | 片段 | `lane` | `0` | 是 |
//! | 素材 | `start` / `duration` | `0s` | 否 |

use motion_core::{ConversionWarning, ConvertError};
use quick_xml::{Reader, events::BytesStart};

use super::{
    constants::{
        ATTR_DURATION, ATTR_FORMAT, ATTR_FRAME_DURATION, ATTR_HEIGHT, ATTR_ID, ATTR_KIND,
        ATTR_LANE, ATTR_NAME, ATTR_OFFSET, ATTR_REF, ATTR_SRC, ATTR_START, ATTR_WIDTH,
        DEFAULT_CLIP_NAME, MEDIA_REP_ORIGINAL,
    },
    utils::{get_attribute, get_string_attribute, get_time_attribute},
};

/// 片段类元素（`video` / `asset-clip` / `title` / `ref-clip` 以及容器）的属性。
#[derive(Debug, Clone, PartialEq)]
pub(super) struct ClipAttributes {
    pub(super) name: String,
    pub(super) reference: String,
    /// 原始 `offset`，尚未换算到主时间线
    pub(super) offset: f64,
    pub(super) duration: f64,
    pub(super) start: f64,
    pub(super) lane: i32,
}

impl ClipAttributes {
    pub(super) fn read(
        e: &BytesStart,
        reader: &Reader<&[u8]>,
        warnings: &mut Vec<ConversionWarning>,
    ) -> Result<Self, ConvertError> {
        let element = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();

        let name = get_string_attribute(e, reader, ATTR_NAME)?
            .unwrap_or_else(|| DEFAULT_CLIP_NAME.to_string());
        let reference = get_string_attribute(e, reader, ATTR_REF)?.unwrap_or_default();
        let start = get_time_attribute(e, reader, ATTR_START, warnings)?.unwrap_or(0.0);

        let offset = get_time_attribute(e, reader, ATTR_OFFSET, warnings)?
            .unwrap_or_else(|| defaulted(warnings, &element, "offset", 0.0));
        let duration = get_time_attribute(e, reader, ATTR_DURATION, warnings)?
            .unwrap_or_else(|| defaulted(warnings, &element, "duration", 0.0));

        let lane = get_attribute(e, reader, ATTR_LANE, |s| s.trim().parse::<i32>().ok())?
            .flatten()
            .unwrap_or_else(|| defaulted(warnings, &element, "lane", 0));

        Ok(Self {
            name,
            reference,
            offset,
            duration,
            start,
            lane,
        })
    }
}

/// `<asset>` 的属性。没有 `id` 的素材会被忽略。
#[derive(Debug, Clone, PartialEq)]
pub(super) struct AssetAttributes {
    pub(super) id: Option<String>,
    pub(super) start: f64,
    pub(super) duration: f64,
    /// 较新版本的 FCPXML 直接在 `<asset>` 上给出 `src`
    pub(super) src: Option<String>,
    pub(super) format: Option<String>,
}

impl AssetAttributes {
    pub(super) fn read(
        e: &BytesStart,
        reader: &Reader<&[u8]>,
        warnings: &mut Vec<ConversionWarning>,
    ) -> Result<Self, ConvertError> {
        Ok(Self {
            id: get_string_attribute(e, reader, ATTR_ID)?,
            start: get_time_attribute(e, reader, ATTR_START, warnings)?.unwrap_or(0.0),
            duration: get_time_attribute(e, reader, ATTR_DURATION, warnings)?.unwrap_or(0.0),
            src: get_string_attribute(e, reader, ATTR_SRC)?,
            format: get_string_attribute(e, reader, ATTR_FORMAT)?,
        })
    }
}

/// `<media-rep>` 的属性。
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct MediaRepAttributes {
    pub(super) src: Option<String>,
    /// `kind="original-media"`
    pub(super) is_original: bool,
}

impl MediaRepAttributes {
    pub(super) fn read(e: &BytesStart, reader: &Reader<&[u8]>) -> Result<Self, ConvertError> {
        Ok(Self {
            src: get_string_attribute(e, reader, ATTR_SRC)?,
            is_original: get_string_attribute(e, reader, ATTR_KIND)?
                .is_some_and(|kind| kind == MEDIA_REP_ORIGINAL),
        })
    }
}

/// `<format>` 的属性。宽高只有在两者都能解析时才有效。
#[derive(Debug, Clone, PartialEq)]
pub(super) struct FormatAttributes {
    pub(super) id: Option<String>,
    pub(super) dimensions: Option<(u32, u32)>,
    /// 单帧时长（秒），仅保留正值
    pub(super) frame_duration: Option<f64>,
}

impl FormatAttributes {
    pub(super) fn read(
        e: &BytesStart,
        reader: &Reader<&[u8]>,
        warnings: &mut Vec<ConversionWarning>,
    ) -> Result<Self, ConvertError> {
        let parse_dimension = |s: &str| s.trim().parse::<u32>().ok();
        let width = get_attribute(e, reader, ATTR_WIDTH, parse_dimension)?.flatten();
        let height = get_attribute(e, reader, ATTR_HEIGHT, parse_dimension)?.flatten();

        Ok(Self {
            id: get_string_attribute(e, reader, ATTR_ID)?,
            dimensions: width.zip(height),
            frame_duration: get_time_attribute(e, reader, ATTR_FRAME_DURATION, warnings)?
                .filter(|d| *d > 0.0),
        })
    }
}

fn defaulted<T: ToString>(
    warnings: &mut Vec<ConversionWarning>,
    element: &str,
    attribute: &'static str,
    default: T,
) -> T {
    warnings.push(ConversionWarning::AttributeDefaulted {
        element: element.to_string(),
        attribute,
        default: default.to_string(),
    });
    default
}
