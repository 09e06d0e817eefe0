pub mod config;
pub mod epub;

// === 核心API重新导出 ===

/// EPUB构建会话（主要接口）
pub use epub::EpubBuilder;

/// 书籍元数据
pub use epub::BookMetadata;

/// EPUB文件读取器
pub use epub::{BookInfo, Epub};

/// 错误处理
pub use epub::{EpubError, Result};

/// 配置
pub use config::Config;

// === 底层组件（高级用法） ===

/// 会话标识与内容登记
pub use epub::{ContentEntry, ContentKind, ContentRegistry, Identity};

/// 容器组件
pub use epub::{Container, RootFile};

/// OPF组件
pub use epub::{ManifestItem, Opf, SpineItem};

/// NCX与导航文档组件
pub use epub::{DocTitle, NavLink, NavMap, NavPoint, Ncx};

// === 库信息 ===

/// 库的版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 库的描述
pub const DESCRIPTION: &str = "把一组图片打包成EPUB3漫画书的工具库";

// === 便捷函数 ===

/// 把一组图片按顺序打包成EPUB
///
/// 这是`EpubBuilder::scoped`的便捷包装函数。
///
/// # 参数
/// * `metadata` - 书籍元数据
/// * `images` - 图片路径，顺序即阅读顺序
///
/// # 返回值
/// * `Result<PathBuf>` - 写出的EPUB文件路径
///
/// # 示例
///
/// ```rust,no_run
/// use comicforge::BookMetadata;
///
/// let path = comicforge::build(BookMetadata::new("Test Book"), ["cover.jpg", "001.jpg"])?;
/// println!("已生成: {}", path.display());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn build<I, P>(metadata: BookMetadata, images: I) -> Result<std::path::PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<std::path::Path>,
{
    EpubBuilder::scoped(metadata, |builder| builder.add_images(images))
}

/// 快速打开EPUB文件
///
/// 这是`Epub::new`的便捷包装函数。
pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Epub> {
    Epub::new(path)
}
