use std::{fmt, io, path::PathBuf};

use quick_xml::{
    Error as QuickXmlErrorMain, encoding::EncodingError,
    events::attributes::AttrError as QuickXmlAttrError,
};
use thiserror::Error;

/// 定义转换过程中可能发生的各种致命错误。
#[derive(Error, Debug)]
pub enum ConvertError {
    /// XML 读写错误，通常来自 `quick-xml` 库。
    #[error("XML 错误: {0}")]
    Xml(#[from] QuickXmlErrorMain),
    /// XML 属性解析错误，通常来自 `quick-xml` 库。
    #[error("XML 属性错误: {0}")]
    Attribute(#[from] QuickXmlAttrError),
    /// XML 文本编码或解码错误。
    #[error("文本编码或解码错误: {0}")]
    Encoding(#[from] EncodingError),
    /// 输入文档结构无效，无法得到完整的时间线模型。
    #[error("解析错误: {0}")]
    Parse(String),
    /// 文件读写等IO错误。
    #[error("IO 错误: {0}")]
    Io(#[from] io::Error),
    /// 目标文件无法写入。
    #[error("无法写入 {path:?}: {source}")]
    Write {
        /// 目标路径
        path: PathBuf,
        /// 底层 IO 错误
        #[source]
        source: io::Error,
    },
    /// 从字节序列转换为 UTF-8 字符串失败。
    #[error("UTF-8 转换错误: {0}")]
    FromUtf8(#[from] std::string::FromUtf8Error),
    /// 内部逻辑错误或未明确分类的错误。
    #[error("错误: {0}")]
    Internal(String),
}

impl From<ConvertError> for std::io::Error {
    fn from(err: ConvertError) -> Self {
        Self::other(err)
    }
}

/// 错误发生的阶段，用于向用户说明是哪一步失败了。
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    /// 读取并解析输入文档
    #[strum(to_string = "解析")]
    Parsing,
    /// 生成并写出目标工程文件
    #[strum(to_string = "写入")]
    Writing,
    /// 其他内部错误
    #[strum(to_string = "内部处理")]
    Internal,
}

impl ConvertError {
    /// 把任意可显示的错误包装成 `Parse` 错误。
    pub fn new_parse<E: fmt::Display>(err: E) -> Self {
        Self::Parse(err.to_string())
    }

    /// 创建一个带有目标路径的写入错误。
    #[must_use]
    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// 判断错误属于哪个阶段。
    ///
    /// 读取输入时的 IO 错误也算作解析阶段；写出阶段的 IO 错误
    /// 总是以 [`ConvertError::Write`] 的形式出现。
    #[must_use]
    pub const fn phase(&self) -> Phase {
        match self {
            Self::Xml(_)
            | Self::Attribute(_)
            | Self::Encoding(_)
            | Self::Parse(_)
            | Self::Io(_)
            | Self::FromUtf8(_) => Phase::Parsing,
            Self::Write { .. } => Phase::Writing,
            Self::Internal(_) => Phase::Internal,
        }
    }

    /// 面向用户的单行错误描述：失败的阶段加上底层原因。
    #[must_use]
    pub fn user_message(&self) -> String {
        format!("{}失败: {self}", self.phase())
    }
}

/// 解析过程中产生的非致命问题。它们会被记录下来，但不会中止转换。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionWarning {
    /// `ref-clip` 引用了一个不存在的复合片段定义，该引用被跳过。
    #[error("ref-clip '{clip}' 引用了未知的媒体定义 '{reference}'，已跳过")]
    UnresolvedReference {
        /// `ref-clip` 的名称
        clip: String,
        /// 找不到的媒体定义 ID
        reference: String,
    },
    /// 缺失或无效的可选属性被替换为默认值。
    #[error("<{element}> 缺少有效的 {attribute} 属性，使用默认值 {default}")]
    AttributeDefaulted {
        /// 元素名
        element: String,
        /// 属性名
        attribute: &'static str,
        /// 替换后的默认值
        default: String,
    },
    /// 无法识别的时间码被当作 0 秒处理。
    #[error("无法解析时间码 '{value}'，按 0 秒处理")]
    MalformedTime {
        /// 原始时间码字符串
        value: String,
    },
}

impl ConversionWarning {
    /// 属性默认值替换非常常见，只在调试级别记录。
    #[must_use]
    pub const fn is_routine(&self) -> bool {
        matches!(self, Self::AttributeDefaulted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_classification() {
        let parse = ConvertError::Parse("unexpected end".to_string());
        assert_eq!(parse.phase(), Phase::Parsing);

        let write = ConvertError::write(
            "/tmp/out.motn",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(write.phase(), Phase::Writing);
        assert!(write.user_message().starts_with("写入失败"));
        assert!(write.user_message().contains("denied"));

        assert_eq!(ConvertError::Internal("x".into()).phase(), Phase::Internal);
    }

    #[test]
    fn test_convert_error_into_io_error() {
        let io_err: io::Error = ConvertError::Internal("boom".into()).into();
        assert_eq!(io_err.kind(), io::ErrorKind::Other);
        assert!(io_err.to_string().contains("boom"));
    }
}
