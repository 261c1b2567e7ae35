//! rkvdec-cli - RK3399 视频解码器配置工具
//!
//! 离线生成一帧的寄存器配置和辅助表, 查询和调整格式.

mod frame;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::debug;

use rkvdec::codec::{
    Fourcc, PixFormat, RK3399_VDEC_FORMATS, default_format, enum_framesizes, find_format, try_fmt,
};
use rkvdec::core::VpuConfig;
use rkvdec::logging::{self, LoggingConfig};

use frame::{DumpReport, FrameFile, run_frame};

#[derive(Parser, Debug)]
#[command(name = "rkvdec-cli", version, about = "RK3399 视频解码器配置工具")]
struct Cli {
    /// 运行配置文件 (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// 日志文件目录, 不指定时只输出到控制台
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// 日志级别 (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 生成一帧的寄存器写入, SPS/PPS 参数包和 RPS 表
    Dump(DumpArgs),
    /// 列出支持的格式
    Formats,
    /// 调整格式到硬件可接受的值
    TryFmt(TryFmtArgs),
}

#[derive(Args, Debug)]
struct DumpArgs {
    /// 帧描述文件 (JSON)
    #[arg(short, long)]
    frame: PathBuf,

    /// 输出宽度, 默认取 SPS
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// 输出高度, 默认取 SPS
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// 以 JSON 输出
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct TryFmtArgs {
    /// 格式代码, 如 S264 或 NV12
    #[arg(long, default_value = "S264")]
    fourcc: Fourcc,

    #[arg(long)]
    width: u32,

    #[arg(long)]
    height: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(LoggingConfig {
        directory: cli.log_dir.clone(),
        file_prefix: "rkvdec-cli".to_string(),
        ..LoggingConfig::with_verbosity(cli.verbose)
    })?;

    let config = load_config(cli.config.as_deref())?;
    debug!("运行配置: {:?}", config);

    match cli.command {
        Command::Dump(args) => dump(&config, &args),
        Command::Formats => formats(),
        Command::TryFmt(args) => try_format(&args),
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<VpuConfig> {
    let Some(path) = path else {
        return Ok(VpuConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("读取配置失败, path={}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("解析配置失败, path={}", path.display()))
}

fn dump(config: &VpuConfig, args: &DumpArgs) -> Result<()> {
    let frame = FrameFile::load(&args.frame)?;
    let size = args.width.zip(args.height);
    let report = run_frame(&frame, config, size)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &DumpReport) {
    println!("输出: {}x{}", report.width, report.height);
    println!();
    println!("寄存器写入 ({} 个):", report.registers.len());
    for entry in &report.registers {
        println!(
            "  0x{:03x} {:<20} = 0x{:08x}{}",
            entry.offset,
            entry.name.unwrap_or("-"),
            entry.value,
            if entry.ordered { "  (有序)" } else { "" }
        );
    }
    println!();
    println!("SPS/PPS 参数包 (pps_id={}):", report.pps_id);
    print_words(&report.pps_record);
    println!();
    println!("RPS 表:");
    print_words(&report.rps);
}

fn print_words(words: &[u32]) {
    for (row, chunk) in words.chunks(8).enumerate() {
        let line: Vec<String> = chunk.iter().map(|w| format!("{:08x}", w)).collect();
        println!("  {:03x}: {}", row * 32, line.join(" "));
    }
}

fn formats() -> Result<()> {
    for fmt in RK3399_VDEC_FORMATS.iter() {
        match enum_framesizes(&RK3399_VDEC_FORMATS, 0, fmt.fourcc) {
            Ok(range) => println!(
                "{}  {:<10} {}..{} (步长 {}) x {}..{} (步长 {})",
                fmt.fourcc,
                fmt.codec_mode.name(),
                range.min_width,
                range.max_width,
                range.step_width,
                range.min_height,
                range.max_height,
                range.step_height
            ),
            Err(_) => println!("{}  {:<10} 跟随码流格式", fmt.fourcc, "raw"),
        }
    }
    Ok(())
}

fn try_format(args: &TryFmtArgs) -> Result<()> {
    let coded = find_format(&RK3399_VDEC_FORMATS, args.fourcc)
        .map_or(true, |fmt| fmt.is_coded());
    let coded_fmt =
        default_format(&RK3399_VDEC_FORMATS, true).context("格式表缺少码流格式")?;
    let mut pix = PixFormat::new(args.fourcc, args.width, args.height);
    let fmt = try_fmt(&RK3399_VDEC_FORMATS, &mut pix, coded, coded_fmt)?;
    debug!("选中格式 {} ({})", fmt.fourcc, fmt.codec_mode);
    println!("{}", serde_json::to_string_pretty(&pix)?);
    Ok(())
}
