//! # Motion 生成器 - 工具函数模块
//!
//! `<parameter>` 元素和简单文本元素的写入辅助函数，以及多处共用的参数块。

use std::{fmt::Display, io};

use quick_xml::{Writer, events::BytesText, writer::ElementWriter};

use super::timing::{RetimeCurve, format_time};

pub(super) const PARAM_INFO: &str = "情報";
pub(super) const PARAM_OBJECT: &str = "オブジェクト";
/// 情報 / オブジェクト 等参数组共用的标志位
pub(super) const FLAGS_PARAM_GROUP: u64 = 8_589_938_704;
/// 节点的 `<baseFlags>` 常用值
pub(super) const BASE_FLAGS_NODE: u64 = 524_304;

/// 写入 `<name>text</name>`。
pub(super) fn write_text_element<W: io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: impl Display,
) -> io::Result<()> {
    writer
        .create_element(name)
        .write_text_content(BytesText::new(&text.to_string()))?;
    Ok(())
}

/// 写入 `<timing in=".." out=".." offset=".."/>`，三个值都已格式化。
pub(super) fn write_timing<W: io::Write>(
    writer: &mut Writer<W>,
    in_point: &str,
    out_point: &str,
    offset: &str,
) -> io::Result<()> {
    writer
        .create_element("timing")
        .with_attribute(("in", in_point))
        .with_attribute(("out", out_point))
        .with_attribute(("offset", offset))
        .write_empty()?;
    Ok(())
}

/// 创建一个 `<parameter name id flags>` 元素，调用方决定写空元素还是写子内容。
pub(super) fn parameter<'a, W: io::Write>(
    writer: &'a mut Writer<W>,
    name: &str,
    id: u32,
    flags: u64,
) -> ElementWriter<'a, W> {
    writer
        .create_element("parameter")
        .with_attribute(("name", name))
        .with_attribute(("id", id.to_string().as_str()))
        .with_attribute(("flags", flags.to_string().as_str()))
}

/// 写入带 `default` 和 `value` 的空参数。
pub(super) fn write_value_parameter<W: io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    id: u32,
    flags: u64,
    default: impl Display,
    value: impl Display,
) -> io::Result<()> {
    parameter(writer, name, id, flags)
        .with_attribute(("default", default.to_string().as_str()))
        .with_attribute(("value", value.to_string().as_str()))
        .write_empty()?;
    Ok(())
}

/// 写入空的 情報 / オブジェクト 参数对。
pub(super) fn write_empty_param_groups<W: io::Write>(writer: &mut Writer<W>) -> io::Result<()> {
    parameter(writer, PARAM_INFO, 1, FLAGS_PARAM_GROUP).write_empty()?;
    parameter(writer, PARAM_OBJECT, 2, FLAGS_PARAM_GROUP).write_empty()?;
    Ok(())
}

/// 写入 `メディア` 参数块，`source_param_id` 在图像节点和音轨中不同。
pub(super) fn write_source_media<W: io::Write>(
    writer: &mut Writer<W>,
    source_param_id: u32,
    source_id: u32,
) -> io::Result<()> {
    parameter(writer, "メディア", 324, FLAGS_PARAM_GROUP).write_inner_content(|writer| {
        write_value_parameter(
            writer,
            "ソースメディア",
            source_param_id,
            77_309_476_880,
            0,
            source_id,
        )?;
        parameter(writer, "ソースメディア", 325, 8_590_000_146).write_empty()?;
        Ok(())
    })?;
    Ok(())
}

/// 写入两个关键帧的 `リタイミング値` 曲线以及它的缓存参数。
pub(super) fn write_retime<W: io::Write>(
    writer: &mut Writer<W>,
    curve: &RetimeCurve,
) -> io::Result<()> {
    parameter(writer, "リタイミング値", 304, 8_590_066_066).write_inner_content(|writer| {
        writer
            .create_element("curve")
            .with_attribute(("type", "1"))
            .with_attribute(("default", "1"))
            .with_attribute(("value", "1"))
            .with_attribute(("round", "0"))
            .write_inner_content(|writer| {
                write_text_element(writer, "numberOfKeypoints", 2)?;
                for (local, frame) in [
                    (curve.start_local, curve.start_frame),
                    (curve.end_local, curve.end_frame),
                ] {
                    writer
                        .create_element("keypoint")
                        .with_attribute(("flags", "0"))
                        .write_inner_content(|writer| {
                            write_text_element(writer, "time", format_time(local))?;
                            write_text_element(writer, "value", frame)?;
                            Ok(())
                        })?;
                }
                Ok(())
            })?;
        Ok(())
    })?;
    write_value_parameter(writer, "リタイミング値のキャッシュ", 319, 8_590_065_810, 1, 1)
}
