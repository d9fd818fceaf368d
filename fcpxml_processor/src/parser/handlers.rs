//! # FCPXML 解析器 - 事件处理器与分发器
//!
//! 该模块负责顶层的事件分发，以及资源区（格式、素材、复合片段定义）的状态维护。

use std::str;

use motion_core::{ConversionWarning, ConvertError, Format, MediaDefinition};
use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use tracing::debug;

use super::{
    attributes::{AssetAttributes, FormatAttributes, MediaRepAttributes},
    clips,
    constants::{
        ATTR_DURATION, ATTR_ID, TAG_ASSET, TAG_FORMAT, TAG_MEDIA, TAG_MEDIA_REP, TAG_RESOURCES,
        TAG_SEQUENCE, TAG_TEXT,
    },
    state::{FcpxmlParserState, PendingAsset},
    utils::{get_string_attribute, get_time_attribute, resolve_entity},
};

/// 处理一个 XML 事件。
pub(super) fn handle_event(
    event: &Event<'_>,
    state: &mut FcpxmlParserState,
    reader: &Reader<&[u8]>,
    warnings: &mut Vec<ConversionWarning>,
) -> Result<(), ConvertError> {
    match event {
        Event::Start(e) => {
            state.open_elements += 1;
            state.seen_root = true;
            handle_start(e, state, reader, warnings)?;
        }
        Event::End(e) => {
            state.open_elements = state.open_elements.saturating_sub(1);
            handle_end(e.local_name().as_ref(), state);
        }
        Event::Text(e) => {
            if let Some(buffer) = state.collecting_text() {
                buffer.push_str(&e.xml_content().map_err(ConvertError::new_parse)?);
            }
        }
        Event::CData(e) => {
            if let Some(buffer) = state.collecting_text() {
                buffer.push_str(&e.decode().map_err(ConvertError::new_parse)?);
            }
        }
        Event::GeneralRef(e) => {
            if let Some(buffer) = state.collecting_text() {
                let entity_name = str::from_utf8(e.as_ref()).map_err(|err| {
                    ConvertError::Parse(format!("无法将实体名解码为UTF-8: {err}"))
                })?;
                match resolve_entity(entity_name) {
                    Some(decoded_char) => buffer.push(decoded_char),
                    None => debug!("忽略了未知的XML实体 '&{entity_name};'"),
                }
            }
        }
        _ => {}
    }
    Ok(())
}

fn handle_start(
    e: &BytesStart,
    state: &mut FcpxmlParserState,
    reader: &Reader<&[u8]>,
    warnings: &mut Vec<ConversionWarning>,
) -> Result<(), ConvertError> {
    let local_name = e.local_name();
    let tag = local_name.as_ref();

    if let Some(kind) = clips::clip_kind(tag) {
        return clips::process_clip_start(kind, e, state, reader, warnings);
    }

    match tag {
        TAG_RESOURCES => state.in_resources = true,
        TAG_MEDIA if state.in_resources => {
            if let Some(id) = get_string_attribute(e, reader, ATTR_ID)? {
                state
                    .media_definitions
                    .insert(id.clone(), MediaDefinition::new(id.clone()));
                state.current_media_id = Some(id);
            }
        }
        TAG_FORMAT => process_format_start(e, state, reader, warnings)?,
        TAG_ASSET => {
            let attrs = AssetAttributes::read(e, reader, warnings)?;
            state.pending_asset = attrs.id.map(|id| PendingAsset {
                id,
                start: attrs.start,
                duration: attrs.duration,
                src: attrs.src,
                format_id: attrs.format,
            });
        }
        TAG_MEDIA_REP => {
            if let Some(pending) = state.pending_asset.as_mut() {
                let attrs = MediaRepAttributes::read(e, reader)?;
                if let Some(src) = attrs.src {
                    pending.offer_src(src, attrs.is_original);
                }
            }
        }
        TAG_SEQUENCE if !state.in_resources => {
            if let Some(duration) = get_time_attribute(e, reader, ATTR_DURATION, warnings)? {
                state.project.duration = duration;
            }
        }
        TAG_TEXT => {
            if let Some(title) = state.title_stack.last_mut() {
                title.text_depth += 1;
            }
        }
        _ => {}
    }
    Ok(())
}

fn handle_end(tag: &[u8], state: &mut FcpxmlParserState) {
    if let Some(kind) = clips::clip_kind(tag) {
        clips::process_clip_end(kind, state);
        return;
    }

    match tag {
        TAG_RESOURCES => state.in_resources = false,
        TAG_MEDIA => state.current_media_id = None,
        TAG_ASSET => state.commit_pending_asset(),
        TAG_TEXT => {
            if let Some(title) = state.title_stack.last_mut() {
                title.text_depth = title.text_depth.saturating_sub(1);
            }
        }
        _ => {}
    }
}

/// 处理 `<format>`：记录尺寸，并把它作为工程的当前默认尺寸和帧率。
fn process_format_start(
    e: &BytesStart,
    state: &mut FcpxmlParserState,
    reader: &Reader<&[u8]>,
    warnings: &mut Vec<ConversionWarning>,
) -> Result<(), ConvertError> {
    let attrs = FormatAttributes::read(e, reader, warnings)?;
    let Some(id) = attrs.id else {
        return Ok(());
    };

    if let Some((width, height)) = attrs.dimensions {
        state.formats.insert(
            id,
            Format {
                width,
                height,
                frame_duration: attrs.frame_duration,
            },
        );
        // 最后出现的格式生效
        state.project.width = width;
        state.project.height = height;
    }

    if let Some(frame_duration) = attrs.frame_duration {
        state.project.frame_rate = 1.0 / frame_duration;
    }

    Ok(())
}
