use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use fcpxml_processor::parse_fcpxml;
use motion_core::{ConvertError, FcpxmlParsingOptions, Project};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

const FCPXML_EXTENSION: &str = "fcpxml";
const MOTION_EXTENSION: &str = "motn";

/// 输入是否为 FCPXML 文档（按扩展名，不区分大小写）。
pub fn is_fcpxml(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(FCPXML_EXTENSION))
}

/// 默认输出路径：与输入同目录、同名，扩展名为 `.motn`。
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension(MOTION_EXTENSION)
}

/// 从输入文件得到工程模型。
///
/// FCPXML 文档按时间线解析；其他文件被当作单个媒体，生成只含一个片段的工程。
pub fn load_project(input: &Path, options: &FcpxmlParsingOptions) -> Result<Project, ConvertError> {
    if !is_fcpxml(input) {
        info!("{input:?} 不是 FCPXML 文档，按单个媒体文件处理");
        return Ok(Project::from_media_file(input, options));
    }

    let content = fs::read_to_string(input)?;
    let parsed = parse_fcpxml(&content, options)?;
    if !parsed.warnings.is_empty() {
        warn!("解析 {input:?} 时出现 {} 个警告", parsed.warnings.len());
    }
    debug!(
        "已解析 {} 个片段, {} 个素材",
        parsed.project.clips.len(),
        parsed.project.assets.len()
    );
    Ok(parsed.project)
}

/// 原子地写出文件：先写入同目录的临时文件，再重命名到目标位置。
pub fn write_atomically(path: &Path, content: &str) -> Result<(), ConvertError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(parent).map_err(|e| ConvertError::write(path, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| ConvertError::write(path, e))?;
    file.persist(path)
        .map_err(|e| ConvertError::write(path, e.error))?;

    info!("已写入 {path:?}");
    Ok(())
}
