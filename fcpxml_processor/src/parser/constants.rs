//! # FCPXML 解析器 - 常量定义
//!
//! 该模块包含了在解析 FCPXML 文件时用到的所有 XML 标签和属性的常量定义。
//! 标签按本地名匹配，带命名空间前缀的元素（例如 `fcpxml:asset`）同样适用。

pub(super) const TAG_RESOURCES: &[u8] = b"resources";
pub(super) const TAG_MEDIA: &[u8] = b"media";
pub(super) const TAG_FORMAT: &[u8] = b"format";
pub(super) const TAG_ASSET: &[u8] = b"asset";
pub(super) const TAG_MEDIA_REP: &[u8] = b"media-rep";
pub(super) const TAG_SEQUENCE: &[u8] = b"sequence";
pub(super) const TAG_TEXT: &[u8] = b"text";

pub(super) const TAG_VIDEO: &[u8] = b"video";
pub(super) const TAG_ASSET_CLIP: &[u8] = b"asset-clip";
pub(super) const TAG_TITLE: &[u8] = b"title";
pub(super) const TAG_REF_CLIP: &[u8] = b"ref-clip";

pub(super) const ATTR_ID: &[u8] = b"id";
pub(super) const ATTR_NAME: &[u8] = b"name";
pub(super) const ATTR_REF: &[u8] = b"ref";
pub(super) const ATTR_OFFSET: &[u8] = b"offset";
pub(super) const ATTR_DURATION: &[u8] = b"duration";
pub(super) const ATTR_START: &[u8] = b"start";
pub(super) const ATTR_LANE: &[u8] = b"lane";
pub(super) const ATTR_SRC: &[u8] = b"src";
pub(super) const ATTR_KIND: &[u8] = b"kind";
pub(super) const ATTR_FORMAT: &[u8] = b"format";
pub(super) const ATTR_WIDTH: &[u8] = b"width";
pub(super) const ATTR_HEIGHT: &[u8] = b"height";
pub(super) const ATTR_FRAME_DURATION: &[u8] = b"frameDuration";

pub(super) const MEDIA_REP_ORIGINAL: &str = "original-media";
pub(super) const DEFAULT_CLIP_NAME: &str = "Untitled";
