use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use motion_core::{FcpxmlParsingOptions, MotionGenerationOptions};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SETTINGS_FILE_NAME: &str = "settings.toml";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("读取配置文件 {path:?} 失败: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("解析配置文件 {path:?} 失败: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// 命令行工具的持久化配置。所有字段都可省略。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// 默认的日志过滤指令
    pub log_level: String,
    /// 转换成功后是否自动打开结果
    pub open_after_convert: bool,
    pub parsing: FcpxmlParsingOptions,
    pub generation: MotionGenerationOptions,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            open_after_convert: false,
            parsing: FcpxmlParsingOptions::default(),
            generation: MotionGenerationOptions::default(),
        }
    }
}

impl AppSettings {
    /// 平台配置目录下的默认配置文件位置。
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "fcp2motion", "fcp2motion")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE_NAME))
    }

    /// 加载配置。文件不存在时使用默认配置。
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, SettingsError> {
        match explicit_path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
