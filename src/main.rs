//! `fcp2motion`：把 Final Cut Pro 导出的 FCPXML 时间线转换为 Apple Motion 工程。

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use fcpxml_processor::generate_motion;
use motion_core::ConvertError;
use tracing::{error, info, warn};

mod cli;
mod io;
mod logger;
mod settings;

use cli::Cli;
use settings::AppSettings;

fn main() -> ExitCode {
    let args = Cli::parse();

    let (settings, settings_error) = match AppSettings::load(args.config.as_deref()) {
        Ok(settings) => (settings, None),
        Err(e) => (AppSettings::default(), Some(e)),
    };

    logger::init(args.log_level.as_deref().unwrap_or(&settings.log_level));
    if let Some(e) = settings_error {
        warn!("[Settings] {e}，使用默认配置");
    }

    match run(&args, &settings) {
        Ok(output) => {
            if args.open || settings.open_after_convert {
                info!("正在打开 {output:?}");
                if let Err(e) = open::that(&output) {
                    warn!("无法打开 {output:?}: {e}");
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

/// 执行一次转换，返回写出的文件路径。
fn run(args: &Cli, settings: &AppSettings) -> Result<PathBuf, ConvertError> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| io::default_output_path(&args.input));

    info!("正在转换 {:?} -> {output:?}", args.input);
    let project = io::load_project(&args.input, &settings.parsing)?;

    let mut options = settings.generation.clone();
    if args.compact {
        options.format = false;
    }

    let document = generate_motion(&project, &options)?;
    io::write_atomically(&output, &document)?;
    Ok(output)
}
