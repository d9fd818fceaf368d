//! # Motion 生成器 - 音频层

use std::io;

use quick_xml::Writer;

use super::{
    ids::AUDIO_MASTER_ID,
    plan::{ClipPlan, MediaPlan, ScenePlan},
    scene::write_master_node,
    timing::format_time,
    utils::{
        BASE_FLAGS_NODE, FLAGS_PARAM_GROUP, PARAM_INFO, PARAM_OBJECT, parameter,
        write_empty_param_groups, write_retime, write_source_media, write_text_element,
        write_timing, write_value_parameter,
    },
};

/// 写入 `<audio>` 音频层：所有音轨，加上它自己的主输出节点。
pub(super) fn write_audio_layer<W: io::Write>(
    writer: &mut Writer<W>,
    plan: &ScenePlan<'_>,
) -> io::Result<()> {
    writer
        .create_element("audio")
        .with_attribute(("name", "Audio Layer"))
        .with_attribute(("id", plan.audio_layer_id.to_string().as_str()))
        .write_inner_content(|writer| {
            for clip in &plan.clips {
                if let (Some(track_id), Some(media)) = (clip.audio_track_id, clip.media()) {
                    write_audio_track(writer, clip, track_id, media)?;
                }
            }

            write_master_node(writer, AUDIO_MASTER_ID, plan.duration_ticks)?;

            write_text_element(writer, "flags", 0)?;
            write_timing(writer, "0 1 1 0", "-4004 120000 1 0", "0 1 1 0")?;
            write_text_element(writer, "foldFlags", 0)?;
            write_text_element(writer, "baseFlags", BASE_FLAGS_NODE)?;
            write_empty_param_groups(writer)
        })?;
    Ok(())
}

fn write_audio_track<W: io::Write>(
    writer: &mut Writer<W>,
    clip: &ClipPlan<'_>,
    track_id: u32,
    media: &MediaPlan,
) -> io::Result<()> {
    writer
        .create_element("audioTrack")
        .with_attribute(("name", clip.clip.name.as_str()))
        .with_attribute(("id", track_id.to_string().as_str()))
        .write_inner_content(|writer| {
            if clip.has_scene_node() {
                write_text_element(writer, "linkedobjects", clip.node_id)?;
            }
            write_text_element(writer, "flags", 0)?;
            write_timing(
                writer,
                &format_time(clip.timing.in_ticks),
                &format_time(clip.timing.out_ticks),
                &format_time(media.node_offset),
            )?;
            write_text_element(writer, "foldFlags", 16_384)?;
            write_text_element(writer, "baseFlags", BASE_FLAGS_NODE)?;

            parameter(writer, PARAM_INFO, 1, FLAGS_PARAM_GROUP).write_inner_content(|writer| {
                write_source_media(writer, 104, media.source_id)?;
                write_value_parameter(writer, "スピード", 111, 8_589_967_376, 1, 1)?;
                write_retime(writer, &media.retime)
            })?;
            parameter(writer, PARAM_OBJECT, 2, FLAGS_PARAM_GROUP).write_inner_content(|writer| {
                write_value_parameter(writer, "レベル", 102, 8_589_967_376, 1, 1)
            })?;
            Ok(())
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use motion_core::{Asset, Clip, ClipKind, MotionGenerationOptions, Project};
    use std::io::Cursor;

    fn project_with(src: &str) -> Project {
        let mut project = Project::default();
        project.assets.push(Asset {
            id: "r1".into(),
            src: src.into(),
            start: 0.0,
            duration: 5.0,
            width: None,
            height: None,
        });
        project.clips.push(Clip {
            name: "track".into(),
            reference_id: "r1".into(),
            offset: 0.0,
            duration: 2.0,
            start: 0.0,
            text: None,
            kind: ClipKind::AssetClip,
            lane: -1,
        });
        project
    }

    fn render_audio(project: &Project) -> String {
        let plan = ScenePlan::build(project, &MotionGenerationOptions::default()).unwrap();
        let mut buffer = Vec::new();
        let mut writer = Writer::new(Cursor::new(&mut buffer));
        write_audio_layer(&mut writer, &plan).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_audio_only_track_is_unlinked() {
        let xml = render_audio(&project_with("file:///m/voice.wav"));
        assert!(xml.starts_with(r#"<audio name="Audio Layer" id="11003"><audioTrack name="track" id="11002"><flags>0</flags>"#));
        assert!(!xml.contains("<linkedobjects>"));
        assert!(xml.contains(
            r#"<parameter name="ソースメディア" id="104" flags="77309476880" default="0" value="10000"/>"#
        ));
    }

    #[test]
    fn test_video_track_links_back_to_node() {
        let xml = render_audio(&project_with("file:///m/clip.mov"));
        assert!(xml.contains(
            r#"<audioTrack name="track" id="11002"><linkedobjects>11001</linkedobjects>"#
        ));
        assert!(xml.contains(r#"<timing in="0 1 1 0" out="-4004 120000 1 0" offset="0 1 1 0"/>"#));
    }

    #[test]
    fn test_silent_media_has_no_track() {
        let xml = render_audio(&project_with("file:///m/still.tiff"));
        assert!(!xml.contains("<audioTrack "));
        assert!(xml.contains(r#"id="11002""#));
    }
}
