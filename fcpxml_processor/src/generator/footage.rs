//! # Motion 生成器 - Footage 处理模块
//!
//! 每个素材一个 `<clip>` 条目。条目的 `offset` 是素材源起点的相反数，
//! 这样以零偏移引用它的节点会看到正确的源帧。

use std::io;

use quick_xml::Writer;

use super::{
    ids::FOOTAGE_ID,
    media::{footage_name, path_url},
    plan::{FootagePlan, ScenePlan},
    timing::{format_time, seconds_to_ticks},
    utils::{
        BASE_FLAGS_NODE, FLAGS_PARAM_GROUP, PARAM_INFO, PARAM_OBJECT, parameter,
        write_text_element, write_timing, write_value_parameter,
    },
};

pub(super) fn write_footage<W: io::Write>(
    writer: &mut Writer<W>,
    plan: &ScenePlan<'_>,
) -> io::Result<()> {
    writer
        .create_element("footage")
        .with_attribute(("name", ""))
        .with_attribute(("id", FOOTAGE_ID.to_string().as_str()))
        .write_inner_content(|writer| {
            for entry in &plan.footage {
                write_footage_clip(writer, entry)?;
            }
            Ok(())
        })?;
    Ok(())
}

fn write_footage_clip<W: io::Write>(
    writer: &mut Writer<W>,
    entry: &FootagePlan<'_>,
) -> io::Result<()> {
    let asset = entry.asset;

    writer
        .create_element("clip")
        .with_attribute(("name", footage_name(&asset.src).as_str()))
        .with_attribute(("id", entry.id.to_string().as_str()))
        .write_inner_content(|writer| {
            write_text_element(writer, "pathURL", path_url(&asset.src))?;
            write_text_element(writer, "missingWidth", entry.width)?;
            write_text_element(writer, "missingHeight", entry.height)?;
            write_text_element(writer, "missingDuration", format!("{:?}", asset.duration))?;
            write_text_element(writer, "missingDynamicRangeType", 0)?;
            write_text_element(writer, "creationDuration", 0)?;
            write_text_element(writer, "mediaID", "")?;
            write_text_element(writer, "flags", 0)?;
            write_timing(
                writer,
                &format_time(0),
                &format_time(seconds_to_ticks(asset.duration)),
                &format_time(-seconds_to_ticks(asset.start)),
            )?;
            write_text_element(writer, "foldFlags", 0)?;
            write_text_element(writer, "baseFlags", BASE_FLAGS_NODE)?;
            parameter(writer, PARAM_INFO, 1, FLAGS_PARAM_GROUP).write_empty()?;
            parameter(writer, PARAM_OBJECT, 2, FLAGS_PARAM_GROUP).write_inner_content(|writer| {
                write_value_parameter(writer, "ピクセルのアスペクト比", 104, 12_884_901_888, 1, 1)
            })?;
            Ok(())
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use motion_core::{Asset, MotionGenerationOptions, Project};
    use std::io::Cursor;

    #[test]
    fn test_footage_entry() {
        let mut project = Project::default();
        project.assets.push(Asset {
            id: "r1".into(),
            src: "file:///Volumes/Media/Interview%201.mov".into(),
            start: 3600.0,
            duration: 12.0,
            width: Some(3840),
            height: Some(2160),
        });
        let plan = ScenePlan::build(&project, &MotionGenerationOptions::default()).unwrap();

        let mut buffer = Vec::new();
        let mut writer = Writer::new(Cursor::new(&mut buffer));
        write_footage(&mut writer, &plan).unwrap();
        let xml = String::from_utf8(buffer).unwrap();

        assert!(xml.starts_with(r#"<footage name="" id="3"><clip name="Interview 1.mov" id="10000">"#));
        assert!(xml.contains("<pathURL>file:///Volumes/Media/Interview%201.mov</pathURL>"));
        assert!(xml.contains("<missingWidth>3840</missingWidth><missingHeight>2160</missingHeight>"));
        assert!(xml.contains("<missingDuration>12.0</missingDuration>"));
        assert!(xml.contains(
            r#"<timing in="0 30000 1 0" out="360000 30000 1 0" offset="-108000000 30000 1 0"/>"#
        ));
        assert!(xml.contains("<mediaID></mediaID>"));
    }
}
