//! # FCPXML 解析器 - 片段处理模块
//!
//! 该模块负责把 `video` / `asset-clip` / `title` / `ref-clip` 元素换算为
//! 主时间线上的绝对片段，包括嵌套时间的合成、复合片段引用的展开和字幕文本的收集。

use motion_core::{Clip, ClipKind, ConversionWarning, ConvertError};
use quick_xml::{Reader, events::BytesStart};
use tracing::debug;

use super::{
    attributes::ClipAttributes,
    constants::{TAG_ASSET_CLIP, TAG_REF_CLIP, TAG_TITLE, TAG_VIDEO},
    state::{ClipContext, FcpxmlParserState, PendingTitle},
};

/// 片段类元素的种类。只有这四种元素会建立时间上下文，
/// `gap` 等其他容器对子元素的位置没有影响。
pub(super) fn clip_kind(tag: &[u8]) -> Option<ClipKind> {
    match tag {
        TAG_VIDEO => Some(ClipKind::Video),
        TAG_ASSET_CLIP => Some(ClipKind::AssetClip),
        TAG_TITLE => Some(ClipKind::Title),
        TAG_REF_CLIP => Some(ClipKind::RefClip),
        _ => None,
    }
}

/// 处理片段类元素的开始事件。
///
/// 无论元素是否最终产生片段（`ref-clip` 引用无效时不会），都会为它压入一个上下文，
/// 保证与结束事件一一对应。
pub(super) fn process_clip_start(
    kind: ClipKind,
    e: &BytesStart,
    state: &mut FcpxmlParserState,
    reader: &Reader<&[u8]>,
    warnings: &mut Vec<ConversionWarning>,
) -> Result<(), ConvertError> {
    let attrs = ClipAttributes::read(e, reader, warnings)?;
    let absolute_offset = state.context_stack.absolute_offset(attrs.offset);

    state.context_stack.push(ClipContext {
        absolute_start: absolute_offset,
        source_start: attrs.start,
    });

    let clip = Clip {
        name: attrs.name,
        reference_id: attrs.reference,
        offset: absolute_offset,
        duration: attrs.duration,
        start: attrs.start,
        text: None,
        kind,
        lane: attrs.lane,
    };

    match kind {
        ClipKind::RefClip => expand_ref_clip(&clip, state, warnings),
        ClipKind::Title => state.title_stack.push(PendingTitle {
            clip,
            text_buffer: String::new(),
            text_depth: 0,
        }),
        ClipKind::Video | ClipKind::AssetClip => state.store_clip(clip),
    }

    Ok(())
}

/// 处理片段类元素的结束事件：弹出上下文，字幕在此时带着文本入库。
pub(super) fn process_clip_end(kind: ClipKind, state: &mut FcpxmlParserState) {
    if kind == ClipKind::Title
        && let Some(PendingTitle {
            mut clip,
            text_buffer,
            ..
        }) = state.title_stack.pop()
    {
        let text = text_buffer.trim();
        clip.text = (!text.is_empty()).then(|| text.to_string());
        state.store_clip(clip);
    }

    if state.context_stack.pop().is_none() {
        debug!("片段结束时上下文栈已为空");
    }
}

/// 展开一个 `ref-clip`：把引用的复合片段定义中的每个子片段放到主时间线上。
///
/// 子片段的新位置 = 引用片段的绝对位置 + (子片段 offset - 引用片段的 start)，
/// 层级为两者之和。找不到定义时记录警告并跳过。
fn expand_ref_clip(
    ref_clip: &Clip,
    state: &mut FcpxmlParserState,
    warnings: &mut Vec<ConversionWarning>,
) {
    let Some(definition) = state.media_definitions.get(&ref_clip.reference_id) else {
        warnings.push(ConversionWarning::UnresolvedReference {
            clip: ref_clip.name.clone(),
            reference: ref_clip.reference_id.clone(),
        });
        return;
    };

    debug!(
        "展开 ref-clip '{}'：定义 '{}' 含 {} 个子片段",
        ref_clip.name,
        definition.id,
        definition.clips.len()
    );
    let expanded: Vec<Clip> = definition
        .clips
        .iter()
        .map(|sub_clip| Clip {
            offset: ref_clip.offset + (sub_clip.offset - ref_clip.start),
            lane: ref_clip.lane + sub_clip.lane,
            ..sub_clip.clone()
        })
        .collect();

    for clip in expanded {
        debug!(
            "展开 ref-clip '{}' -> '{}'，位置 {:.4}s",
            ref_clip.name, clip.name, clip.offset
        );
        state.store_clip(clip);
    }
}
