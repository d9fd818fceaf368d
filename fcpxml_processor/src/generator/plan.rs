//! # Motion 生成器 - 场景规划
//!
//! 在写出任何 XML 之前，先为所有素材和片段分配 ID 并算好时间，
//! 写出阶段只读取这里的结果。

use std::collections::HashMap;

use motion_core::{Asset, Clip, ClipKind, ConvertError, MotionGenerationOptions, Project};
use tracing::debug;

use super::{
    ids::IdAllocator,
    media::MediaKind,
    timing::{ClipTiming, FrameGrid, RetimeCurve, seconds_to_ticks},
};

/// 一个素材在 footage 中的条目。
#[derive(Debug, Clone)]
pub(super) struct FootagePlan<'a> {
    pub(super) asset: &'a Asset,
    pub(super) id: u32,
    pub(super) width: u32,
    pub(super) height: u32,
}

/// 图像/音频片段引用媒体的方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct MediaPlan {
    pub(super) kind: MediaKind,
    /// 对应 footage 条目的 ID，找不到素材时为 0
    pub(super) source_id: u32,
    /// 节点本地时间的原点（tick）
    pub(super) node_offset: i64,
    pub(super) width: u32,
    pub(super) height: u32,
    pub(super) retime: RetimeCurve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum NodePlan {
    Text,
    Media(MediaPlan),
}

/// 一个片段对应的全部节点。
#[derive(Debug, Clone)]
pub(super) struct ClipPlan<'a> {
    pub(super) clip: &'a Clip,
    pub(super) group_id: u32,
    pub(super) node_id: u32,
    pub(super) audio_track_id: Option<u32>,
    pub(super) timing: ClipTiming,
    pub(super) node: NodePlan,
}

impl ClipPlan<'_> {
    /// 是否写出 group / scenenode。纯音频片段只有音轨。
    pub(super) fn has_scene_node(&self) -> bool {
        match self.node {
            NodePlan::Text => true,
            NodePlan::Media(media) => media.kind.has_visual(),
        }
    }

    pub(super) const fn media(&self) -> Option<&MediaPlan> {
        match &self.node {
            NodePlan::Text => None,
            NodePlan::Media(media) => Some(media),
        }
    }
}

#[derive(Debug, Clone)]
pub(super) struct ScenePlan<'a> {
    pub(super) project: &'a Project,
    pub(super) footage: Vec<FootagePlan<'a>>,
    pub(super) clips: Vec<ClipPlan<'a>>,
    pub(super) audio_layer_id: u32,
    /// 工程时长（tick）
    pub(super) duration_ticks: i64,
}

impl<'a> ScenePlan<'a> {
    /// 依次为素材、片段和音频层分配 ID，并计算每个片段的时间。
    ///
    /// # Errors
    ///
    /// 工程帧率不是正的有限值时返回 `ConvertError::Internal`。
    pub(super) fn build(
        project: &'a Project,
        options: &MotionGenerationOptions,
    ) -> Result<Self, ConvertError> {
        let grid = FrameGrid::new(project.frame_rate)?;

        let mut asset_ids = IdAllocator::starting_at(options.asset_id_base);
        let mut source_ids: HashMap<&str, u32> = HashMap::new();
        let footage: Vec<FootagePlan<'a>> = project
            .assets
            .iter()
            .map(|asset| {
                let id = asset_ids.next_id();
                source_ids.entry(asset.id.as_str()).or_insert(id);
                let (width, height) = asset.dimensions_or(project);
                FootagePlan {
                    asset,
                    id,
                    width,
                    height,
                }
            })
            .collect();

        // 片段 ID 从素材 ID 之后开始，避免两个池重叠
        let mut clip_ids =
            IdAllocator::starting_at(options.clip_id_base.max(asset_ids.peek()));

        let clips: Vec<ClipPlan<'a>> = project
            .clips
            .iter()
            .map(|clip| {
                let group_id = clip_ids.next_id();
                let node_id = clip_ids.next_id();
                let timing = ClipTiming::new(clip.offset, clip.duration, grid);
                let node = if clip.kind == ClipKind::Title {
                    NodePlan::Text
                } else {
                    NodePlan::Media(plan_media(clip, project, &source_ids, timing, grid))
                };
                let audio_track_id = match node {
                    NodePlan::Media(media) if media.kind.has_audio() => Some(clip_ids.next_id()),
                    _ => None,
                };

                debug!(
                    "片段 '{}' -> group {group_id}, scenenode {node_id}, 音轨 {audio_track_id:?}",
                    clip.name
                );

                ClipPlan {
                    clip,
                    group_id,
                    node_id,
                    audio_track_id,
                    timing,
                    node,
                }
            })
            .collect();

        let audio_layer_id = clip_ids.next_id();

        Ok(Self {
            project,
            footage,
            clips,
            audio_layer_id,
            duration_ticks: seconds_to_ticks(project.duration),
        })
    }

    /// 场景中所有由分配器发出的 ID，按分配顺序。
    #[cfg(test)]
    fn allocated_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.footage.iter().map(|f| f.id).collect();
        for clip in &self.clips {
            ids.extend([clip.group_id, clip.node_id]);
            ids.extend(clip.audio_track_id);
        }
        ids.push(self.audio_layer_id);
        ids
    }
}

fn plan_media(
    clip: &Clip,
    project: &Project,
    source_ids: &HashMap<&str, u32>,
    timing: ClipTiming,
    grid: FrameGrid,
) -> MediaPlan {
    let asset = project.asset(&clip.reference_id);

    let (kind, source_id, node_offset, (width, height)) = match asset {
        Some(asset) => (
            MediaKind::classify(&asset.src),
            source_ids.get(asset.id.as_str()).copied().unwrap_or(0),
            timing.in_ticks - seconds_to_ticks(clip.start) + seconds_to_ticks(asset.start),
            asset.dimensions_or(project),
        ),
        None => {
            debug!(
                "片段 '{}' 引用的素材 '{}' 不存在，按无音频的图像处理",
                clip.name, clip.reference_id
            );
            (MediaKind::VideoOnly, 0, 0, (project.width, project.height))
        }
    };

    MediaPlan {
        kind,
        source_id,
        node_offset,
        width,
        height,
        retime: RetimeCurve::new(timing, node_offset, grid),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use motion_core::MotionGenerationOptionsBuilder;

    fn asset(id: &str, src: &str, start: f64) -> Asset {
        Asset {
            id: id.into(),
            src: src.into(),
            start,
            duration: 20.0,
            width: None,
            height: None,
        }
    }

    fn clip(kind: ClipKind, reference: &str, offset: f64, start: f64) -> Clip {
        Clip {
            name: format!("{kind}"),
            reference_id: reference.into(),
            offset,
            duration: 2.0,
            start,
            text: (kind == ClipKind::Title).then(|| "Hi".to_string()),
            kind,
            lane: 0,
        }
    }

    fn sample_project() -> Project {
        let mut project = Project::default();
        project.assets = vec![
            asset("r1", "file:///m/a.mov", 10.0),
            asset("r2", "file:///m/b.wav", 0.0),
            asset("r3", "file:///m/c.png", 0.0),
        ];
        project.clips = vec![
            clip(ClipKind::AssetClip, "r1", 1.0, 12.0),
            clip(ClipKind::Title, "r9", 2.0, 0.0),
            clip(ClipKind::AssetClip, "r2", 3.0, 0.0),
            clip(ClipKind::Video, "r3", 4.0, 0.0),
        ];
        project
    }

    #[test]
    fn test_id_allocation_order() {
        let project = sample_project();
        let plan = ScenePlan::build(&project, &MotionGenerationOptions::default()).unwrap();

        let footage_ids: Vec<u32> = plan.footage.iter().map(|f| f.id).collect();
        assert_eq!(footage_ids, vec![10_000, 10_001, 10_002]);

        let mov = &plan.clips[0];
        assert_eq!((mov.group_id, mov.node_id), (11_000, 11_001));
        assert_eq!(mov.audio_track_id, Some(11_002));

        let title = &plan.clips[1];
        assert_eq!((title.group_id, title.node_id), (11_003, 11_004));
        assert_eq!(title.audio_track_id, None);
        assert_eq!(title.node, NodePlan::Text);

        let wav = &plan.clips[2];
        assert_eq!(wav.audio_track_id, Some(11_007));
        assert!(!wav.has_scene_node());

        let png = &plan.clips[3];
        assert_eq!(png.audio_track_id, None);
        assert!(png.has_scene_node());

        assert_eq!(plan.audio_layer_id, 11_010);
    }

    #[test]
    fn test_ids_are_unique_when_pools_would_overlap() {
        let project = sample_project();
        let options = MotionGenerationOptionsBuilder::default()
            .asset_id_base(11_000u32)
            .clip_id_base(11_001u32)
            .build()
            .unwrap();
        let plan = ScenePlan::build(&project, &options).unwrap();

        let ids = plan.allocated_ids();
        let unique: HashSet<u32> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
        assert_eq!(plan.clips[0].group_id, 11_003);
        for reserved in [3, 9998, 9999] {
            assert!(!unique.contains(&reserved));
        }
    }

    #[test]
    fn test_node_offset_rebases_source_time() {
        let project = sample_project();
        let plan = ScenePlan::build(&project, &MotionGenerationOptions::default()).unwrap();

        let media = plan.clips[0].media().unwrap();
        assert_eq!(media.kind, MediaKind::VideoWithAudio);
        assert_eq!(media.source_id, 10_000);
        // 30000 - 360000 + 300000
        assert_eq!(media.node_offset, -30_000);
        assert_eq!(media.retime.start_local, 60_000);
        assert_eq!(media.retime.start_frame, 61);
        assert_eq!((media.width, media.height), (1920, 1080));
    }

    #[test]
    fn test_missing_asset_is_video_only() {
        let mut project = Project::default();
        project.clips = vec![clip(ClipKind::Video, "nowhere", 0.0, 0.0)];
        let plan = ScenePlan::build(&project, &MotionGenerationOptions::default()).unwrap();
        let media = plan.clips[0].media().unwrap();
        assert_eq!(media.kind, MediaKind::VideoOnly);
        assert_eq!(media.source_id, 0);
        assert_eq!(media.node_offset, 0);
    }

    #[test]
    fn test_invalid_frame_rate_fails() {
        let mut project = sample_project();
        project.frame_rate = 0.0;
        assert!(ScenePlan::build(&project, &MotionGenerationOptions::default()).is_err());
    }
}
