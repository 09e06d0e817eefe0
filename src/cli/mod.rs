//! 命令行子命令实现

mod images;

use clap::Args;
use comicforge::config::DEFAULT_CONFIG_PATH;
use comicforge::{BookMetadata, Config, Epub, EpubBuilder, EpubError, Result};
use images::collect_images;
use std::path::{Path, PathBuf};

/// build子命令参数
#[derive(Args)]
pub struct BuildArgs {
    /// 书名
    #[arg(short, long, help = "书名（必填）")]
    pub title: String,

    /// 排序用书名
    #[arg(long, help = "排序用书名，默认与书名相同")]
    pub title_sort: Option<String>,

    /// 作者
    #[arg(short, long, help = "作者，默认使用配置中的default_creator")]
    pub creator: Option<String>,

    /// 系列名
    #[arg(long, help = "系列名")]
    pub series: Option<String>,

    /// 系列序号
    #[arg(long, requires = "series", help = "系列中的序号")]
    pub index: Option<String>,

    /// 语言
    #[arg(short, long, help = "书籍语言，默认使用配置中的language")]
    pub language: Option<String>,

    /// 输出路径
    #[arg(short, long, help = "输出文件路径，默认由书名生成")]
    pub output: Option<PathBuf>,

    /// 封面
    #[arg(long, help = "封面图片，放在第一页")]
    pub cover: Option<PathBuf>,

    /// 图片文件或目录
    #[arg(required = true, help = "图片文件或包含jpg图片的目录")]
    pub inputs: Vec<PathBuf>,
}

impl BuildArgs {
    /// 合并命令行参数与配置得到元数据
    fn metadata(&self, config: &Config) -> BookMetadata {
        let mut metadata = BookMetadata::new(self.title.clone())
            .with_creator(self.creator.clone().unwrap_or_else(|| config.default_creator.clone()))
            .with_language(self.language.clone().unwrap_or_else(|| config.language.clone()));
        if let Some(title_sort) = &self.title_sort {
            metadata = metadata.with_title_sort(title_sort.clone());
        }
        if let Some(series) = &self.series {
            metadata = metadata.with_series(series.clone(), self.index.clone());
        }
        metadata
    }
}

/// 构建EPUB
pub fn build(args: &BuildArgs, config: &Config, verbose: bool) -> Result<()> {
    println!("📚 ComicForge - 图片转EPUB");

    let images = collect_images(&args.inputs, args.cover.as_deref())?;
    if images.is_empty() {
        return Err(EpubError::NoImages);
    }
    println!("🖼️  共找到 {} 张图片", images.len());

    let mut builder = EpubBuilder::new(args.metadata(config))?
        .with_compression_level(config.compression_level);
    if let Some(dir) = &config.output_dir {
        builder = builder.with_output_dir(dir);
    }
    if let Some(output) = &args.output {
        builder = builder.with_output(output);
    }

    let total = images.len();
    let output = builder.run(|builder| {
        for (i, image) in images.iter().enumerate() {
            if verbose {
                println!("  {}/{}. {}", i + 1, total, image.display());
            }
            builder.add_image(image)?;
        }
        Ok::<(), EpubError>(())
    })?;

    println!("✅ 已生成: {}", output.display());
    Ok(())
}

/// 检查EPUB文件并打印概要
pub fn inspect(path: &Path, verbose: bool) -> Result<()> {
    println!("正在检查EPUB文件: {}", path.display());

    // 创建Epub实例，会自动验证mimetype
    let mut epub = Epub::new(path)?;
    println!("✅ EPUB验证成功: mimetype正确");

    println!("\n📁 EPUB文件内容:");
    let files = epub.list_files()?;
    if verbose {
        for (i, file) in files.iter().enumerate() {
            println!("  {}. {}", i + 1, file);
        }
    } else {
        println!("  共找到 {} 个文件", files.len());
    }

    println!("\n📦 OPF文件路径: {}", epub.get_opf_path()?);

    let info = epub.get_book_info()?;
    println!("\n📊 元数据:");
    println!("  📖 书名: {}", info.title);
    println!("  ✍️  作者: {}", info.creator);
    println!("  🌐 语言: {}", info.language);
    if let Some(identifier) = &info.identifier {
        println!("  🔖 标识符: {}", identifier);
    }
    if let Some(series) = &info.series {
        match &info.series_index {
            Some(index) => println!("  📚 系列: {} #{}", series, index),
            None => println!("  📚 系列: {}", series),
        }
    }
    println!("  📄 页面: {}  🖼️  图片: {}", info.page_count, info.image_count);

    if verbose {
        println!("\n📑 阅读顺序:");
        for (i, image) in epub.page_images()?.iter().enumerate() {
            println!("  {}. {}", i + 1, image);
        }
    }

    match epub.parse_ncx()? {
        Some(ncx) => {
            println!("\n🧭 NCX导航:");
            if let Some(uid) = ncx.get_uid() {
                println!("  🔖 UID: {}", uid);
            }
            for nav_point in ncx.get_all_nav_points() {
                println!("  • {} -> {}", nav_point.nav_label.text, nav_point.content.src);
            }
        }
        None => println!("\n⚠️  没有NCX导航文件"),
    }

    let links = epub.nav_links()?;
    println!("\n🗂️  导航文档: {} 个链接", links.len());
    if verbose {
        for link in &links {
            println!("  • {} -> {}", link.label, link.href);
        }
    }

    println!("\n🎉 EPUB文件检查完成！");
    Ok(())
}

/// 在当前目录生成默认配置文件
pub fn init_config() -> Result<()> {
    Config::generate_default_config(DEFAULT_CONFIG_PATH)?;
    println!("✅ 已生成默认配置文件: {}", DEFAULT_CONFIG_PATH);
    Ok(())
}
