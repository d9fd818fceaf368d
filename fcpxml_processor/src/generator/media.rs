//! # Motion 生成器 - 媒体分类与路径
//!
//! 通过扩展名判断片段是否携带音频。这是一个近似：视频容器一律
//! 视为带有音轨，不读取文件本身。

use std::path::{Path, PathBuf};

use tracing::warn;
use url::Url;

const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "m4a", "aiff", "caf", "aac"];
const VIDEO_EXTENSIONS: &[&str] = &["mov", "mp4", "m4v", "avi"];

const FALLBACK_FOOTAGE_NAME: &str = "Media";

/// 片段引用的媒体种类，决定生成哪些节点。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MediaKind {
    /// 只生成音轨
    AudioOnly,
    /// 生成图像节点，并生成与之互相链接的音轨
    VideoWithAudio,
    /// 只生成图像节点
    VideoOnly,
}

impl MediaKind {
    pub(super) fn classify(src: &str) -> Self {
        let extension = file_extension(src).to_ascii_lowercase();
        if AUDIO_EXTENSIONS.contains(&extension.as_str()) {
            Self::AudioOnly
        } else if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
            Self::VideoWithAudio
        } else {
            Self::VideoOnly
        }
    }

    pub(super) const fn has_visual(self) -> bool {
        !matches!(self, Self::AudioOnly)
    }

    pub(super) const fn has_audio(self) -> bool {
        !matches!(self, Self::VideoOnly)
    }
}

/// 源位置的最后一个路径组件（已做百分号解码）。
fn last_component(src: &str) -> Option<String> {
    if let Ok(url) = Url::parse(src)
        && url.scheme().len() > 1
    {
        // 单字母协议视为 Windows 盘符
        let segment = url.path_segments()?.next_back()?;
        return percent_decode(segment);
    }

    let path = src.split(['?', '#']).next().unwrap_or(src);
    let component = path.rsplit(['/', '\\']).next()?;
    percent_decode(component)
}

fn percent_decode(segment: &str) -> Option<String> {
    let decoded = urlencoding::decode(segment)
        .map_or_else(|_| segment.to_string(), |decoded| decoded.into_owned());
    (!decoded.is_empty()).then_some(decoded)
}

fn file_extension(src: &str) -> String {
    last_component(src)
        .and_then(|name| {
            Path::new(&name)
                .extension()
                .map(|ext| ext.to_string_lossy().into_owned())
        })
        .unwrap_or_default()
}

/// 素材在 footage 中显示的名字。
pub(super) fn footage_name(src: &str) -> String {
    last_component(src).unwrap_or_else(|| FALLBACK_FOOTAGE_NAME.to_string())
}

/// 素材的 `pathURL`：已是 `file://` URL 时原样保留，否则按文件路径转换。
pub(super) fn path_url(src: &str) -> String {
    if src.starts_with("file://") {
        return src.to_string();
    }

    let path = PathBuf::from(src);
    let absolute = std::path::absolute(&path).unwrap_or(path);
    if let Ok(url) = Url::from_file_path(&absolute) {
        url.to_string()
    } else {
        warn!("无法把 '{src}' 转换为文件 URL，按原样写入");
        src.to_string()
    }
}
