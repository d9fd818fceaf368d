use std::path::PathBuf;

use clap::Parser;

/// 把 FCPXML 时间线（或单个媒体文件）转换为 Motion 工程。
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// 输入文件：`.fcpxml` 文档，或任意媒体文件
    pub input: PathBuf,
    /// 输出的 `.motn` 路径，默认与输入同名同目录
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// 转换成功后用默认程序打开结果
    #[arg(long)]
    pub open: bool,
    /// 输出不带缩进的 XML
    #[arg(long)]
    pub compact: bool,
    /// 日志级别或 `EnvFilter` 指令，覆盖配置文件
    #[arg(long)]
    pub log_level: Option<String>,
    /// 使用指定的配置文件代替默认位置
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
