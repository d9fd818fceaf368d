//! # Motion 生成器 - 固定文档块
//!
//! 工厂声明以及画布、检视器、时间线、检查器的默认设置。
//! 这些内容与工程无关，Motion 打开文档时需要它们逐字存在。

use std::io;

use quick_xml::Writer;

use super::utils::write_text_element;

/// `(id, uuid, 描述)`
const FACTORIES: &[(u32, &str, &str)] = &[
    (1, "044beba5ad3211d7ac9b000393833f6a", "スタイル"),
    (11, "66fc0d6af6a911d6a7a7000393670732", "イメージ"),
    (13, "6b337e9c21aa11d7a08700039375d2ba", "出力"),
    (17, "aee0a63927494ed19a9667c9f83badfd", "素材"),
    (18, "babfc7777f4711d7aaa7000393833f6a", "テキスト"),
];

const CANVAS: &[(&str, &str)] = &[("layout", "1"), ("activeView", "0")];

const VIEWER: &[(&str, &str)] = &[
    ("resolutionMode", "0"),
    ("dynamicResolution", "1"),
    ("viewmode", "0"),
    ("overlayOptions", "125452"),
    ("oscOptions", "30"),
    ("compensateAspectRatio", "1"),
    ("renderFields", "0"),
    ("showMotionBlur", "0"),
    ("showFrameBlending", "1"),
    ("showLighting", "1"),
    ("showShadows", "1"),
    ("showReflection", "1"),
    ("showDepthOfField", "0"),
    ("renderFullView", "0"),
    ("renderQuality", "2"),
    ("textRenderQuality", "2"),
    ("showHighQualityResampling", "0"),
    ("showShapeAntialiasing", "1"),
    ("show3DIntersectionAntialiasing", "0"),
    ("cameraType", "0"),
    ("cameraName", "アクティブカメラ"),
    ("mirrorHMD", "0"),
];

const PROJECT_PANEL: &[(&str, &str)] = &[
    ("layersPreviewColumn", "1"),
    ("layersOpacityColumn", "0"),
    ("layersBlendColumn", "0"),
    ("displayMasks", "1"),
    ("displayBehaviors", "1"),
    ("displayEffects", "1"),
    ("layersVerticalZoom", "1.7999999523162842"),
    ("mediaPreviewColumn", "1"),
    ("mediaTypeColumn", "1"),
    ("mediaDurationColumn", "1"),
    ("mediaInUseColumn", "1"),
    ("mediaFrameSizeColumn", "1"),
    ("mediaCompressorColumn", "1"),
    ("mediaDepthColumn", "1"),
    ("mediaFrameRateColumn", "1"),
    ("mediaDataRateColumn", "1"),
    ("mediaAudioRateColumn", "1"),
    ("mediaAudioFormatColumn", "1"),
    ("mediaFileSizeColumn", "1"),
    ("mediaFileCreatedColumn", "1"),
    // Motion 自身的拼写
    ("mediaDileModifiedColumn", "1"),
    ("mediaVerticalZoom", "1.7999999523162842"),
];

const TIMELINE: &[(&str, &str)] = &[
    ("displayVideo", "1"),
    ("displayAudio", "0"),
    ("displayKeyframes", "0"),
    ("displayMasks", "1"),
    ("displayBehaviors", "1"),
    ("displayEffects", "1"),
    ("videoVerticalZoom", "2.2222222222222223"),
    ("audioVerticalZoom", "2.2222222222222223"),
];

const CURVE_EDITOR: &[(&str, &str)] = &[
    ("autozoom", "0"),
    ("snapping", "0"),
    ("displayAudioWaveform", "0"),
    ("lockKeyframesInTime", "0"),
];

const DISPLAY_RANGE_IN: &str = "-2552104997 1729492187 3 0";
const DISPLAY_RANGE_OUT: &str = "59300071684 1000000000 3 0";

const INSPECTOR_COLLAPSED: &[&str] = &["./1/100", "./1/200", "./1/344"];

fn write_simple_children<W: io::Write>(
    writer: &mut Writer<W>,
    children: &[(&str, &str)],
) -> io::Result<()> {
    for (name, text) in children {
        write_text_element(writer, name, text)?;
    }
    Ok(())
}

fn write_display_range<W: io::Write>(writer: &mut Writer<W>) -> io::Result<()> {
    writer
        .create_element("displayRange")
        .with_attribute(("in", DISPLAY_RANGE_IN))
        .with_attribute(("out", DISPLAY_RANGE_OUT))
        .write_empty()?;
    Ok(())
}

/// 写入 `<scene>` 之前的全部固定内容。
pub(super) fn write_document_preamble<W: io::Write>(writer: &mut Writer<W>) -> io::Result<()> {
    write_text_element(writer, "displayversion", "5.10")?;

    for (id, uuid, description) in FACTORIES {
        writer
            .create_element("factory")
            .with_attribute(("id", id.to_string().as_str()))
            .with_attribute(("uuid", *uuid))
            .write_inner_content(|writer| {
                write_text_element(writer, "description", description)?;
                write_text_element(writer, "manufacturer", "Apple")?;
                write_text_element(writer, "version", 1)?;
                Ok(())
            })?;
    }

    write_text_element(writer, "build", "")?;
    write_text_element(writer, "description", "")?;

    writer
        .create_element("canvas")
        .write_inner_content(|writer| write_simple_children(writer, CANVAS))?;

    writer
        .create_element("viewer")
        .with_attribute(("subview", "0"))
        .write_inner_content(|writer| {
            write_simple_children(writer, VIEWER)?;
            writer
                .create_element("panZoom")
                .with_attributes([
                    ("camera", "0"),
                    ("zoom", "0.66388887166976929"),
                    ("panX", "186"),
                    ("panY", "5"),
                    ("mode", "2"),
                    ("centered", "1"),
                ])
                .write_empty()?;
            Ok(())
        })?;

    writer
        .create_element("projectPanel")
        .write_inner_content(|writer| write_simple_children(writer, PROJECT_PANEL))?;

    writer.create_element("timeline").write_inner_content(|writer| {
        write_simple_children(writer, TIMELINE)?;
        write_display_range(writer)
    })?;

    writer
        .create_element("curveeditor")
        .write_inner_content(|writer| {
            write_simple_children(writer, CURVE_EDITOR)?;
            write_display_range(writer)?;
            writer
                .create_element("currentviewvolume")
                .with_attributes([
                    ("originx", "-1.4756383499060004"),
                    ("originy", "-62.5"),
                    ("width", "60.775710033999999"),
                    ("height", "125"),
                ])
                .write_empty()?;
            write_text_element(writer, "snapshotChannels", 0)
        })?;

    writer.create_element("inspector").write_inner_content(|writer| {
        for id in INSPECTOR_COLLAPSED {
            writer
                .create_element("collapseState")
                .with_attribute(("id", *id))
                .with_attribute(("state", "1"))
                .write_empty()?;
        }
        Ok(())
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_preamble_contains_fixed_blocks() {
        let mut buffer = Vec::new();
        let mut writer = Writer::new(Cursor::new(&mut buffer));
        write_document_preamble(&mut writer).unwrap();
        let xml = String::from_utf8(buffer).unwrap();

        assert!(xml.starts_with("<displayversion>5.10</displayversion>"));
        assert_eq!(xml.matches("<factory ").count(), 5);
        assert!(xml.contains(
            r#"<factory id="18" uuid="babfc7777f4711d7aaa7000393833f6a"><description>テキスト</description><manufacturer>Apple</manufacturer><version>1</version></factory>"#
        ));
        assert!(xml.contains("<build></build><description></description><canvas>"));
        assert!(xml.contains(
            r#"<panZoom camera="0" zoom="0.66388887166976929" panX="186" panY="5" mode="2" centered="1"/>"#
        ));
        assert_eq!(xml.matches("<displayRange ").count(), 2);
        assert!(xml.ends_with(
            r#"<collapseState id="./1/344" state="1"/></inspector>"#
        ));
    }
}
