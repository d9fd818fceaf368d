//! # 解析器的状态机和数据结构

use std::collections::HashMap;

use motion_core::{
    Asset, Clip, FcpxmlParsingOptions, Format, MediaDefinition, Project,
};
use tracing::debug;

/// 嵌套片段的时间上下文：片段在主时间线上的起点，以及它自身的源起点。
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct ClipContext {
    pub(super) absolute_start: f64,
    pub(super) source_start: f64,
}

impl ClipContext {
    /// 把子元素的原始 `offset` 换算到主时间线上。
    ///
    /// 子元素的 `offset` 处在父元素的源时间轴上，
    /// 因此绝对位置 = 父元素起点 + (子 offset - 父元素源起点)。
    pub(super) fn resolve(self, raw_offset: f64) -> f64 {
        self.absolute_start + (raw_offset - self.source_start)
    }
}

/// 显式的上下文栈。每个可能包含子片段的元素入栈一次，元素结束时出栈一次。
#[derive(Debug, Default)]
pub(super) struct ContextStack {
    frames: Vec<ClipContext>,
}

impl ContextStack {
    /// 根据栈顶的父上下文计算绝对位置；没有父元素时原样返回。
    pub(super) fn absolute_offset(&self, raw_offset: f64) -> f64 {
        self.frames
            .last()
            .map_or(raw_offset, |parent| parent.resolve(raw_offset))
    }

    pub(super) fn push(&mut self, context: ClipContext) {
        self.frames.push(context);
    }

    pub(super) fn pop(&mut self) -> Option<ClipContext> {
        self.frames.pop()
    }

    pub(super) fn depth(&self) -> usize {
        self.frames.len()
    }
}

/// 正在解析的 `<asset>` 的临时数据，在 `</asset>` 时转换为 [`Asset`]。
#[derive(Debug, Default)]
pub(super) struct PendingAsset {
    pub(super) id: String,
    pub(super) start: f64,
    pub(super) duration: f64,
    pub(super) src: Option<String>,
    pub(super) format_id: Option<String>,
}

impl PendingAsset {
    /// 记录一个 `<media-rep>` 的 `src`：优先原始媒体，否则只在尚无 `src` 时采用。
    pub(super) fn offer_src(&mut self, src: String, is_original: bool) {
        if is_original || self.src.is_none() {
            self.src = Some(src);
        }
    }
}

/// 正在解析的 `<title>`，文本在 `</title>` 时写入片段。
#[derive(Debug)]
pub(super) struct PendingTitle {
    pub(super) clip: Clip,
    pub(super) text_buffer: String,
    /// 当前位于几层 `<text>` 之内
    pub(super) text_depth: u32,
}

/// 主解析器状态机。
#[derive(Debug)]
pub(super) struct FcpxmlParserState {
    /// 正在构建的工程，结束时补上 `start_time`
    pub(super) project: Project,

    /// 是否位于 `<resources>` 之内
    pub(super) in_resources: bool,
    /// 当前打开的 `<media>` 的 ID
    pub(super) current_media_id: Option<String>,
    pub(super) media_definitions: HashMap<String, MediaDefinition>,
    pub(super) formats: HashMap<String, Format>,

    pub(super) context_stack: ContextStack,
    pub(super) pending_asset: Option<PendingAsset>,
    pub(super) title_stack: Vec<PendingTitle>,

    /// 尚未闭合的元素数量，用于发现截断的文档
    pub(super) open_elements: usize,
    pub(super) seen_root: bool,
}

impl FcpxmlParserState {
    pub(super) fn new(options: &FcpxmlParsingOptions) -> Self {
        Self {
            project: Project::with_options(options),
            in_resources: false,
            current_media_id: None,
            media_definitions: HashMap::new(),
            formats: HashMap::new(),
            context_stack: ContextStack::default(),
            pending_asset: None,
            title_stack: Vec::new(),
            open_elements: 0,
            seen_root: false,
        }
    }

    /// 把一个已解析的片段放到正确的位置：资源区内放入当前的复合片段定义，
    /// 否则放到主时间线。
    pub(super) fn store_clip(&mut self, clip: Clip) {
        if !self.in_resources {
            self.project.clips.push(clip);
            return;
        }

        match self
            .current_media_id
            .as_ref()
            .and_then(|id| self.media_definitions.get_mut(id))
        {
            Some(definition) => definition.clips.push(clip),
            None => debug!("资源区中 <media> 之外的片段 '{}' 被忽略", clip.name),
        }
    }

    /// 在 `</asset>` 时把临时数据提交为素材。没有任何 `src` 的素材会被丢弃。
    pub(super) fn commit_pending_asset(&mut self) {
        let Some(pending) = self.pending_asset.take() else {
            return;
        };
        let Some(src) = pending.src else {
            debug!("素材 '{}' 没有媒体位置，已忽略", pending.id);
            return;
        };

        let format = pending
            .format_id
            .as_ref()
            .and_then(|id| self.formats.get(id));

        self.project.assets.push(Asset {
            id: pending.id,
            src,
            start: pending.start,
            duration: pending.duration,
            width: format.map(|f| f.width),
            height: format.map(|f| f.height),
        });
    }

    /// 当前是否有标题正在收集 `<text>` 中的字符。
    pub(super) fn collecting_text(&mut self) -> Option<&mut String> {
        self.title_stack
            .last_mut()
            .filter(|title| title.text_depth > 0)
            .map(|title| &mut title.text_buffer)
    }

    /// 结束解析，计算工程的起始时间。
    pub(super) fn finish(mut self) -> Project {
        self.project.start_time = self.project.earliest_offset();
        self.project
    }
}
