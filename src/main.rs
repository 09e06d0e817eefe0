mod cli;

use clap::{Parser, Subcommand};
use comicforge::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 📚 ComicForge - 图片转EPUB工具
#[derive(Parser)]
#[command(name = "comicforge")]
#[command(about = "把一组图片按顺序打包成EPUB3电子书")]
#[command(version)]
struct Cli {
    /// 详细输出模式
    #[arg(short, long, global = true, help = "显示详细信息")]
    verbose: bool,

    /// 配置文件路径
    #[arg(long, global = true, help = "YAML配置文件路径（默认读取当前目录下的comicforge.yaml）")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 把图片打包成EPUB
    Build(cli::BuildArgs),

    /// 检查EPUB文件并显示概要
    Inspect {
        /// EPUB文件路径
        epub_file: PathBuf,
    },

    /// 在当前目录生成默认配置文件
    InitConfig,
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ 错误: {}", e);
            std::process::exit(2);
        }
    };

    let filter = if cli.verbose || config.debug_mode {
        "comicforge=debug"
    } else {
        "comicforge=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match cli.command {
        Commands::Build(args) => cli::build(&args, &config, cli.verbose),
        Commands::Inspect { epub_file } => cli::inspect(&epub_file, cli.verbose),
        Commands::InitConfig => cli::init_config(),
    };

    if let Err(e) = result {
        eprintln!("❌ 错误: {}", e);
        std::process::exit(if e.is_precondition() { 2 } else { 1 });
    }
}
