//! # FCPXML 时间线解析器
//!
//! 单次深度优先遍历 FCPXML 文档，得到一个扁平的、绝对时间的工程模型。
//! 嵌套片段的时间通过显式的上下文栈逐层合成，复合片段引用（`ref-clip`）
//! 在遇到时立即展开。

mod attributes;
mod clips;
mod constants;
mod handlers;
mod state;
mod utils;

pub use self::utils::{parse_time, try_parse_time};

use motion_core::{ConvertError, FcpxmlParsingOptions, ParsedProject};
use quick_xml::{Reader, events::Event};
use tracing::{debug, error, warn};

use self::state::FcpxmlParserState;

/// 解析 FCPXML 文档。
///
/// # 参数
///
/// * `content` - FCPXML 文档内容字符串。
/// * `options` - 解析选项，提供文档未声明时使用的默认尺寸、帧率和时长。
///
/// # 返回
///
/// * `Ok(ParsedProject)` - 解析后的工程，以及解析过程中记录的非致命警告。
/// * `Err(ConvertError)` - 文档无法解析时返回错误，不会返回部分结果。
///
/// # Errors
///
/// * `ConvertError::Xml` - 输入不是格式良好的 XML。
/// * `ConvertError::Parse` - 文档为空、没有任何元素或在元素闭合前结束。
pub fn parse_fcpxml(
    content: &str,
    options: &FcpxmlParsingOptions,
) -> Result<ParsedProject, ConvertError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(false);
    reader.config_mut().expand_empty_elements = true;

    let mut state = FcpxmlParserState::new(options);
    let mut warnings = Vec::new();
    let mut buf = Vec::new();

    loop {
        let event = match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(event) => event,
            Err(e) => {
                error!(
                    "FCPXML 解析错误，位置 {}: {}。无法继续解析",
                    reader.error_position(),
                    e
                );
                return Err(ConvertError::Xml(e));
            }
        };

        handlers::handle_event(&event, &mut state, &reader, &mut warnings)?;
        buf.clear();
    }

    if !state.seen_root {
        return Err(ConvertError::Parse("文档中没有任何 XML 元素".to_string()));
    }
    if state.open_elements > 0 {
        return Err(ConvertError::Parse(format!(
            "文档在 {} 个元素闭合之前结束",
            state.open_elements
        )));
    }

    for warning in &warnings {
        if warning.is_routine() {
            debug!("{warning}");
        } else {
            warn!("{warning}");
        }
    }

    let project = state.finish();
    debug!(
        "解析完成: {} 个素材, {} 个片段, {}x{} @ {:.3}fps",
        project.assets.len(),
        project.clips.len(),
        project.width,
        project.height,
        project.frame_rate
    );

    Ok(ParsedProject { project, warnings })
}
