//! # Motion 工程（ozml）生成器
//!
//! 把解析好的 [`Project`] 转换为 Motion 可以直接打开的场景文档。
//! 整个文档先在内存中生成，调用方拿到完整的字符串后再决定写到哪里。

mod audio;
mod boilerplate;
mod footage;
mod ids;
mod media;
mod plan;
mod scene;
mod timing;
mod utils;

pub use self::timing::TIME_SCALE;

use std::io::Cursor;

use motion_core::{ConvertError, MotionGenerationOptions, Project};
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesText, Event},
};
use tracing::debug;

use self::plan::ScenePlan;

const OZML_VERSION: &str = "5.14";

/// Motion 工程生成的主入口函数。
///
/// # 参数
/// * `project` - 已解析的工程，所有片段都是绝对时间。
/// * `options` - 生成选项，控制输出格式和 ID 池的起点。
///
/// # 返回
///
/// * `Ok(String)` - 完整的 ozml 文档。
///
/// # Errors
///
/// 工程帧率无效，或在生成 XML、转换为字符串时出错时返回 `ConvertError`。
pub fn generate_motion(
    project: &Project,
    options: &MotionGenerationOptions,
) -> Result<String, ConvertError> {
    let plan = ScenePlan::build(project, options)?;
    debug!(
        "生成 Motion 工程: {} 个素材, {} 个片段, 音频层 {}",
        plan.footage.len(),
        plan.clips.len(),
        plan.audio_layer_id
    );

    let mut buffer = Vec::new();
    let indent_char = b' ';
    let indent_size = 2;

    let result = if options.format {
        let mut writer =
            Writer::new_with_indent(Cursor::new(&mut buffer), indent_char, indent_size);
        write_document(&mut writer, &plan)
    } else {
        let mut writer = Writer::new(Cursor::new(&mut buffer));
        write_document(&mut writer, &plan)
    };

    result?;

    String::from_utf8(buffer).map_err(generation_error)
}

/// 生成阶段的失败一律归为内部错误。
fn generation_error(err: impl std::fmt::Display) -> ConvertError {
    ConvertError::Internal(format!("生成 Motion 文档失败: {err}"))
}

fn write_document<W: std::io::Write>(
    writer: &mut Writer<W>,
    plan: &ScenePlan<'_>,
) -> Result<(), ConvertError> {
    write_document_events(writer, plan).map_err(|err| match err {
        ConvertError::Internal(_) => err,
        other => generation_error(other),
    })
}

fn write_document_events<W: std::io::Write>(
    writer: &mut Writer<W>,
    plan: &ScenePlan<'_>,
) -> Result<(), ConvertError> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::DocType(BytesText::from_escaped("ozxmlscene")))?;

    writer
        .create_element("ozml")
        .with_attribute(("version", OZML_VERSION))
        .write_inner_content(|writer| {
            boilerplate::write_document_preamble(writer)?;
            scene::write_scene(writer, plan)?;
            Ok(())
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use motion_core::{MotionGenerationOptionsBuilder, Phase};
    use std::io;

    struct FullDisk;

    impl io::Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_document_header() {
        let options = MotionGenerationOptionsBuilder::default()
            .format(false)
            .build()
            .unwrap();
        let xml = generate_motion(&Project::default(), &options).unwrap();
        assert!(xml.starts_with(
            r#"<?xml version="1.0" encoding="UTF-8"?><!DOCTYPE ozxmlscene><ozml version="5.14"><displayversion>5.10</displayversion>"#
        ));
        assert!(xml.ends_with("</footage></scene></ozml>"));
    }

    #[test]
    fn test_indented_output_is_line_based() {
        let xml = generate_motion(&Project::default(), &MotionGenerationOptions::default()).unwrap();
        let mut lines = xml.lines();
        assert_eq!(lines.next(), Some(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert_eq!(lines.next(), Some("<!DOCTYPE ozxmlscene>"));
        assert_eq!(lines.next(), Some(r#"<ozml version="5.14">"#));
        assert_eq!(lines.next(), Some("  <displayversion>5.10</displayversion>"));
    }

    #[test]
    fn test_invalid_frame_rate_is_reported() {
        let mut project = Project::default();
        project.frame_rate = -1.0;
        assert!(matches!(
            generate_motion(&project, &MotionGenerationOptions::default()),
            Err(ConvertError::Internal(_))
        ));
    }

    #[test]
    fn test_writer_failure_is_not_reported_as_parsing() {
        let project = Project::default();
        let plan = ScenePlan::build(&project, &MotionGenerationOptions::default()).unwrap();
        let mut writer = Writer::new(FullDisk);

        let err = write_document(&mut writer, &plan).unwrap_err();
        assert!(matches!(err, ConvertError::Internal(_)));
        assert_eq!(err.phase(), Phase::Internal);
        assert!(err.to_string().contains("disk full"));
    }
}
