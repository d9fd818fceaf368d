//! # Motion 生成器 - Scene 处理模块
//!
//! 该模块负责生成 `<scene>` 元素：场景设置、每个片段的 group / scenenode、
//! 主输出节点，以及音频层和 footage 两个子块的调度。

use std::io;

use quick_xml::Writer;
use unicode_segmentation::UnicodeSegmentation;

use super::{
    audio::write_audio_layer,
    footage::write_footage,
    ids::MASTER_ID,
    plan::{ClipPlan, MediaPlan, NodePlan, ScenePlan},
    timing::{TIME_SCALE, format_time},
    utils::{
        BASE_FLAGS_NODE, FLAGS_PARAM_GROUP, PARAM_INFO, PARAM_OBJECT, parameter,
        write_empty_param_groups, write_retime, write_source_media, write_text_element,
        write_timing, write_value_parameter,
    },
};

const FACTORY_IMAGE: &str = "11";
const FACTORY_OUTPUT: &str = "13";
const FACTORY_TEXT: &str = "18";

const ZERO_OFFSET: &str = "0 1 1 0";

pub(super) fn write_scene<W: io::Write>(
    writer: &mut Writer<W>,
    plan: &ScenePlan<'_>,
) -> io::Result<()> {
    writer.create_element("scene").write_inner_content(|writer| {
        write_scene_settings(writer, plan)?;

        for clip in plan.clips.iter().filter(|c| c.has_scene_node()) {
            write_group(writer, clip, plan)?;
        }

        write_master_node(writer, MASTER_ID, plan.duration_ticks)?;
        write_audio_layer(writer, plan)?;
        write_footage(writer, plan)?;
        Ok(())
    })?;
    Ok(())
}

fn write_scene_settings<W: io::Write>(
    writer: &mut Writer<W>,
    plan: &ScenePlan<'_>,
) -> io::Result<()> {
    let project = plan.project;
    let duration = plan.duration_ticks;

    writer
        .create_element("sceneSettings")
        .write_inner_content(|writer| {
            write_text_element(writer, "width", project.width)?;
            write_text_element(writer, "height", project.height)?;
            write_text_element(writer, "duration", duration)?;
            write_text_element(writer, "shouldOverrideFCDuration", 0)?;
            write_text_element(writer, "frameRate", format!("{:?}", project.frame_rate))?;
            write_text_element(writer, "NTSC", 1)?;
            write_text_element(writer, "pixelAspectRatio", 1)?;
            write_text_element(writer, "workingGamut", 0)?;
            write_text_element(writer, "viewGamut", 0)?;
            write_text_element(writer, "optimizeForDisplay", 0)?;
            writer
                .create_element("backgroundColor")
                .with_attributes([("red", "0"), ("green", "0"), ("blue", "0"), ("alpha", "1")])
                .write_empty()?;
            for (name, value) in [
                ("audioChannels", "2"),
                ("audioBitsPerSample", "32"),
                ("fieldRenderingMode", "0"),
                ("motionBlurSamples", "8"),
                ("motionBlurDuration", "1"),
                ("sharpScaling", "0"),
                ("startTimecode", "0"),
                ("presetPath", ""),
                ("backgroundMode", "0"),
                ("reflectionRecursionLimit", "2"),
                ("glyphOSCMode", "0"),
                ("animateFlag", "0"),
                ("parameterColorSpaceID", "3"),
                ("savePreviewMovie", "0"),
                ("Object3DEnvironments", "100"),
                ("DRTSupport", "0"),
                ("onHDRDisplay", "0"),
            ] {
                write_text_element(writer, name, value)?;
            }
            Ok(())
        })?;

    writer
        .create_element("publishSettings")
        .write_inner_content(|writer| write_text_element(writer, "version", 2))?;

    write_text_element(writer, "currentFrame", format_time(0))?;
    write_text_element(writer, "activeLayer", 0)?;
    for range in ["timeRange", "playRange"] {
        writer
            .create_element(range)
            .with_attribute(("offset", format_time(0).as_str()))
            .with_attribute(("duration", format_time(duration).as_str()))
            .write_empty()?;
    }
    write_text_element(writer, "flags", 1)?;
    write_text_element(writer, "audioTracks", 28)?;
    writer.create_element("timemarkerset").write_empty()?;
    writer.create_element("guideset").write_empty()?;
    writer
        .create_element("curvesets")
        .with_attribute(("selected", "1"))
        .write_empty()?;
    Ok(())
}

/// 主输出节点。场景和音频层各有一个，ID 固定。
pub(super) fn write_master_node<W: io::Write>(
    writer: &mut Writer<W>,
    id: u32,
    duration_ticks: i64,
) -> io::Result<()> {
    writer
        .create_element("scenenode")
        .with_attribute(("name", "Master"))
        .with_attribute(("factoryID", FACTORY_OUTPUT))
        .with_attribute(("id", id.to_string().as_str()))
        .write_inner_content(|writer| {
            write_text_element(writer, "flags", 0)?;
            write_timing(
                writer,
                &format_time(0),
                &format_time(duration_ticks),
                &format_time(0),
            )?;
            write_text_element(writer, "foldFlags", 0)?;
            write_text_element(writer, "baseFlags", BASE_FLAGS_NODE)?;
            write_empty_param_groups(writer)
        })?;
    Ok(())
}

/// 外层 group：包含一个 scenenode，以及以工程尺寸为默认值的布局参数。
fn write_group<W: io::Write>(
    writer: &mut Writer<W>,
    clip: &ClipPlan<'_>,
    plan: &ScenePlan<'_>,
) -> io::Result<()> {
    let (width, height) = (plan.project.width, plan.project.height);
    let in_point = format_time(clip.timing.in_ticks);
    let out_point = format_time(clip.timing.out_ticks);

    writer
        .create_element("group")
        .with_attribute(("name", clip.clip.name.as_str()))
        .with_attribute(("id", clip.group_id.to_string().as_str()))
        .write_inner_content(|writer| {
            match &clip.node {
                NodePlan::Text => write_text_node(writer, clip)?,
                NodePlan::Media(media) => write_media_node(writer, clip, media)?,
            }

            write_text_element(writer, "aspectRatio", 1)?;
            write_text_element(writer, "flags", 0)?;
            write_timing(writer, &in_point, &out_point, ZERO_OFFSET)?;
            write_text_element(writer, "foldFlags", 0)?;
            write_text_element(writer, "baseFlags", BASE_FLAGS_NODE)?;

            parameter(writer, PARAM_INFO, 1, FLAGS_PARAM_GROUP).write_inner_content(|writer| {
                for (name, id, flags, fold_flags) in [
                    ("ライティング", 230, 8_589_938_706, 15),
                    ("シャドウ", 234, 8_589_938_706, 15),
                    ("反射", 223, 8_589_971_474, 131_087),
                ] {
                    parameter(writer, name, id, flags).write_inner_content(|writer| {
                        write_text_element(writer, "foldFlags", fold_flags)
                    })?;
                }
                Ok(())
            })?;

            parameter(writer, PARAM_OBJECT, 2, FLAGS_PARAM_GROUP).write_inner_content(|writer| {
                write_value_parameter(writer, "固定幅", 302, 12_884_901_908, width, width)?;
                write_value_parameter(writer, "固定高さ", 303, 12_884_901_908, height, height)?;
                write_value_parameter(writer, "平坦化", 311, 8_589_934_610, 0, 0)?;
                write_value_parameter(writer, "レイヤーの順番", 305, 8_589_934_610, 0, 0)?;
                write_value_parameter(writer, "絞りの幅", 312, 12_884_901_906, width, width)?;
                write_value_parameter(writer, "絞りの高さ", 313, 12_884_901_906, height, height)?;
                write_value_parameter(writer, "新規固定解像度ビヘイビア", 315, 8_594_194_480, 1, 0)
            })?;
            Ok(())
        })?;
    Ok(())
}

/// 图像节点：引用 footage 条目，带重定时曲线，有音轨时与之互相链接。
fn write_media_node<W: io::Write>(
    writer: &mut Writer<W>,
    clip: &ClipPlan<'_>,
    media: &MediaPlan,
) -> io::Result<()> {
    writer
        .create_element("scenenode")
        .with_attribute(("name", clip.clip.name.as_str()))
        .with_attribute(("id", clip.node_id.to_string().as_str()))
        .with_attribute(("factoryID", FACTORY_IMAGE))
        .with_attribute(("version", "0"))
        .write_inner_content(|writer| {
            write_text_element(writer, "validTracks", 1)?;
            write_text_element(writer, "aspectRatio", 0)?;
            write_text_element(writer, "flags", 0)?;
            if let Some(audio_track_id) = clip.audio_track_id {
                write_text_element(writer, "linkedobjects", audio_track_id)?;
            }
            write_timing(
                writer,
                &format_time(clip.timing.in_ticks),
                &format_time(clip.timing.out_ticks),
                &format_time(media.node_offset),
            )?;
            write_text_element(writer, "foldFlags", 16_384)?;
            write_text_element(writer, "baseFlags", BASE_FLAGS_NODE)?;

            parameter(writer, PARAM_INFO, 1, FLAGS_PARAM_GROUP).write_inner_content(|writer| {
                write_source_media(writer, 300, media.source_id)?;
                write_retime(writer, &media.retime)
            })?;
            parameter(writer, PARAM_OBJECT, 2, FLAGS_PARAM_GROUP).write_inner_content(|writer| {
                write_value_parameter(writer, "幅", 313, 8_589_934_610, 1, media.width)?;
                write_value_parameter(writer, "高さ", 314, 8_589_934_610, 1, media.height)
            })?;
            Ok(())
        })?;
    Ok(())
}

/// 文本节点：单一样式，样式区间覆盖全部文本。
fn write_text_node<W: io::Write>(writer: &mut Writer<W>, clip: &ClipPlan<'_>) -> io::Result<()> {
    let text = clip.clip.text.as_deref().unwrap_or_default();
    let in_point = format_time(clip.timing.in_ticks);
    let out_point = format_time(clip.timing.out_ticks);

    writer
        .create_element("scenenode")
        .with_attribute(("name", clip.clip.name.as_str()))
        .with_attribute(("id", clip.node_id.to_string().as_str()))
        .with_attribute(("factoryID", FACTORY_TEXT))
        .with_attribute(("version", "0"))
        .write_inner_content(|writer| {
            write_text_element(writer, "aspectRatio", 0)?;
            write_text_element(writer, "flags", 0)?;
            write_timing(writer, &in_point, &out_point, ZERO_OFFSET)?;
            write_text_element(writer, "foldFlags", 0)?;
            write_text_element(writer, "baseFlags", 34_078_736)?;

            writer
                .create_element("style")
                .with_attribute(("name", "Style"))
                .with_attribute(("id", "1"))
                .with_attribute(("factoryID", "1"))
                .write_inner_content(|writer| {
                    write_text_element(writer, "copyFlags", 65_535)?;
                    write_text_element(writer, "previewWidth", 0)?;
                    write_text_element(writer, "previewHeight", 0)?;
                    write_text_element(writer, "presetName", "標準")?;
                    write_timing(writer, &in_point, &out_point, ZERO_OFFSET)?;
                    write_text_element(writer, "baseFlags", 8_657_043_504_u64)?;
                    write_text_element(writer, "foldFlags", 786_432)?;
                    parameter(writer, "フォント", 83, 12_884_906_000).write_inner_content(
                        |writer| {
                            write_text_element(writer, "font", "Helvetica")?;
                            write_text_element(writer, "defaultFont", "Helvetica")
                        },
                    )?;
                    write_value_parameter(writer, "サイズ", 3, 8_589_934_608, 48, 100)
                })?;

            writer
                .create_element("styleRun")
                .with_attribute(("style", "1"))
                .with_attribute(("offset", "0"))
                .with_attribute(("length", text.graphemes(true).count().to_string().as_str()))
                .write_empty()?;

            parameter(writer, PARAM_INFO, 1, FLAGS_PARAM_GROUP).write_empty()?;
            parameter(writer, PARAM_OBJECT, 2, FLAGS_PARAM_GROUP).write_inner_content(|writer| {
                parameter(writer, "テキスト", 369, 8_590_000_128)
                    .write_inner_content(|writer| write_text_element(writer, "text", text))?;
                write_value_parameter(writer, "テキストをレンダリング", 360, 8_590_000_146, 0, 0)
            })?;
            Ok(())
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use motion_core::{Clip, ClipKind, MotionGenerationOptions, Project};
    use std::io::Cursor;

    fn render_scene(project: &Project) -> String {
        let plan = ScenePlan::build(project, &MotionGenerationOptions::default()).unwrap();
        let mut buffer = Vec::new();
        let mut writer = Writer::new(Cursor::new(&mut buffer));
        write_scene(&mut writer, &plan).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_scene_settings() {
        let mut project = Project::default();
        project.duration = 12.5;
        project.frame_rate = 25.0;
        let xml = render_scene(&project);

        assert!(xml.starts_with("<scene><sceneSettings><width>1920</width><height>1080</height><duration>375000</duration>"));
        assert!(xml.contains("<frameRate>25.0</frameRate>"));
        assert!(xml.contains(r#"<timeRange offset="0 30000 1 0" duration="375000 30000 1 0"/>"#));
        assert!(xml.contains(r#"<scenenode name="Master" factoryID="13" id="9999">"#));
        assert!(xml.contains(r#"<scenenode name="Master" factoryID="13" id="9998">"#));
        assert!(xml.contains(r#"<footage name="" id="3">"#));
    }

    #[test]
    fn test_title_node() {
        let mut project = Project::default();
        project.clips.push(Clip {
            name: "Caption".into(),
            reference_id: String::new(),
            offset: 1.0,
            duration: 2.0,
            start: 0.0,
            text: Some("Café & co".into()),
            kind: ClipKind::Title,
            lane: 0,
        });
        let xml = render_scene(&project);

        assert!(xml.contains(r#"<group name="Caption" id="11000">"#));
        assert!(xml.contains(r#"<scenenode name="Caption" id="11001" factoryID="18" version="0">"#));
        assert!(xml.contains(r#"<timing in="30000 30000 1 0" out="89000 30000 1 0" offset="0 1 1 0"/>"#));
        assert!(xml.contains(r#"<styleRun style="1" offset="0" length="9"/>"#));
        assert!(xml.contains("<text>Café &amp; co</text>"));
        // sceneSettings 里总有 <audioTracks>，只检查音轨元素本身
        assert!(xml.contains("<audioTracks>28</audioTracks>"));
        assert!(!xml.contains("<audioTrack "));
    }

    #[test]
    fn test_zero_duration_title_ends_before_in_point() {
        let mut project = Project::default();
        project.clips.push(Clip {
            name: "Flash".into(),
            reference_id: String::new(),
            offset: 1.0,
            duration: 0.0,
            start: 0.0,
            text: Some("!".into()),
            kind: ClipKind::Title,
            lane: 0,
        });
        let xml = render_scene(&project);

        assert!(xml.contains(r#"<timing in="30000 30000 1 0" out="29000 30000 1 0" offset="0 1 1 0"/>"#));
    }
}
