//! EPUB构建会话模块
//!
//! 一个`EpubBuilder`对应一次构建：逐张添加图片，最后一次性写出EPUB文件。
//!
//! 会话状态：`Unopened → Open → Finalized`，以及`Unopened/Open → Aborted`。
//! 第一次添加图片时才生成会话标识并创建内存归档；中止或丢弃会话不会写出任何文件。

use crate::epub::container::OPF_PATH;
use crate::epub::error::{EpubError, Result};
use crate::epub::identity::Identity;
use crate::epub::nav::{NAV_NAME, render_nav};
use crate::epub::ncx::render_ncx;
use crate::epub::opf::{BookMetadata, render_package};
use crate::epub::package::PackageWriter;
use crate::epub::page::{STYLESHEET, render_page};
use crate::epub::registry::{ContentEntry, ContentRegistry, OEBPS_DIR};
use std::fs;
use std::mem;
use std::path::{Path, PathBuf};

/// 会话状态
enum SessionState {
    /// 尚未添加任何图片
    Unopened,
    /// 归档已创建
    Open {
        identity: Identity,
        writer: PackageWriter,
    },
    /// 已写出文件
    Finalized,
    /// 已中止，不会再写出任何内容
    Aborted,
}

impl SessionState {
    fn name(&self) -> &'static str {
        match self {
            SessionState::Unopened => "Unopened",
            SessionState::Open { .. } => "Open",
            SessionState::Finalized => "Finalized",
            SessionState::Aborted => "Aborted",
        }
    }
}

/// 由图片序列构建EPUB的会话
pub struct EpubBuilder {
    metadata: BookMetadata,
    state: SessionState,
    registry: ContentRegistry,
    counter: usize,
    output: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    compression_level: Option<i64>,
}

impl EpubBuilder {
    /// 创建新的构建会话
    ///
    /// # 参数
    /// * `metadata` - 书籍元数据，书名不能为空
    ///
    /// # 返回值
    /// * `Result<EpubBuilder, EpubError>` - 书名为空时返回`MissingTitle`
    pub fn new(metadata: BookMetadata) -> Result<Self> {
        metadata.validate()?;
        Ok(Self {
            metadata,
            state: SessionState::Unopened,
            registry: ContentRegistry::new(),
            counter: 0,
            output: None,
            output_dir: None,
            compression_level: None,
        })
    }

    /// 指定输出文件路径
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// 指定默认文件名所在的输出目录，显式的输出路径优先
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// 指定deflate压缩级别
    pub fn with_compression_level(mut self, level: Option<i64>) -> Self {
        self.compression_level = level;
        self
    }

    pub fn metadata(&self) -> &BookMetadata {
        &self.metadata
    }

    pub fn registry(&self) -> &ContentRegistry {
        &self.registry
    }

    /// 已添加的图片数量
    pub fn image_count(&self) -> usize {
        self.counter
    }

    /// 当前状态名
    pub fn state_name(&self) -> &'static str {
        self.state.name()
    }

    /// 最终写出的文件路径
    pub fn output_path(&self) -> PathBuf {
        if let Some(output) = &self.output {
            return output.clone();
        }
        let file_name = self.metadata.default_file_name();
        match &self.output_dir {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }

    /// 添加一张图片
    ///
    /// 先读取图片文件；读取失败时会话被中止，之后的调用都会返回状态错误。
    ///
    /// # 参数
    /// * `path` - 图片文件路径，内容原样写入归档
    pub fn add_image(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if !matches!(self.state, SessionState::Unopened | SessionState::Open { .. }) {
            return Err(EpubError::InvalidState {
                state: self.state.name(),
                operation: "添加图片",
            });
        }

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(source) => {
                self.release("图片读取失败");
                return Err(EpubError::ImageRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        if let Err(err) = self.write_image(&bytes) {
            self.release("写入归档失败");
            return Err(err);
        }
        tracing::debug!(path = %path.display(), index = self.counter - 1, "已添加图片");
        Ok(())
    }

    /// 依次添加多张图片，遇到第一个错误即返回
    pub fn add_images<I, P>(&mut self, paths: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            self.add_image(path)?;
        }
        Ok(())
    }

    fn write_image(&mut self, bytes: &[u8]) -> Result<()> {
        if matches!(self.state, SessionState::Unopened) {
            let mut writer = PackageWriter::new(self.compression_level);
            writer.open()?;
            let identity = Identity::generate();
            tracing::info!(uuid = %identity.package_uuid, title = %self.metadata.title, "开始构建EPUB");
            self.state = SessionState::Open { identity, writer };
        }
        let writer = match &mut self.state {
            SessionState::Open { writer, .. } => writer,
            other => {
                return Err(EpubError::InvalidState {
                    state: other.name(),
                    operation: "添加图片",
                });
            }
        };

        let index = self.counter;
        let page = ContentEntry::page(index);
        let image = ContentEntry::image(index);

        let xhtml = render_page(&self.metadata.title, &self.metadata.language, &image)?;
        writer.write_entry(&page.archive_path(), &xhtml, false)?;

        let first = index == 0;
        let stylesheet = ContentEntry::stylesheet();
        if first {
            writer.write_entry(&stylesheet.archive_path(), STYLESHEET.as_bytes(), false)?;
        }
        writer.write_entry(&image.archive_path(), bytes, false)?;

        self.registry.register(page);
        if first {
            self.registry.register(stylesheet);
        }
        self.registry.register(image);
        self.counter += 1;
        Ok(())
    }

    /// 写入导航与包文件并保存EPUB
    ///
    /// # 返回值
    /// * `Result<PathBuf, EpubError>` - 写出的文件路径；没有添加任何图片时返回`NoImages`
    pub fn finish(mut self) -> Result<PathBuf> {
        let (identity, mut writer) = match mem::replace(&mut self.state, SessionState::Aborted) {
            SessionState::Open { identity, writer } => (identity, writer),
            SessionState::Unopened => {
                self.state = SessionState::Unopened;
                return Err(EpubError::NoImages);
            }
            other => {
                let state = other.name();
                self.state = other;
                return Err(EpubError::InvalidState {
                    state,
                    operation: "完成构建",
                });
            }
        };

        let output = self.output_path();
        self.write_closing_documents(&identity, &mut writer)?;
        writer.finalize_and_persist(&output)?;

        self.state = SessionState::Finalized;
        tracing::info!(path = %output.display(), images = self.counter, "EPUB构建完成");
        Ok(output)
    }

    fn write_closing_documents(&mut self, identity: &Identity, writer: &mut PackageWriter) -> Result<()> {
        let ncx = ContentEntry::ncx();
        let ncx_xml = render_ncx(&self.metadata, identity, &self.registry)?;
        writer.write_entry(&ncx.archive_path(), &ncx_xml, false)?;
        self.registry.register(ncx);

        let opf = render_package(&self.metadata, identity, &self.registry)?;
        writer.write_entry(OPF_PATH, &opf, false)?;

        let nav = render_nav(&self.registry)?;
        writer.write_entry(&format!("{}/{}", OEBPS_DIR, NAV_NAME), &nav, false)?;
        Ok(())
    }

    /// 放弃本次构建，不写出任何文件
    pub fn abort(mut self) {
        self.release("调用者中止");
    }

    fn release(&mut self, reason: &str) {
        if let SessionState::Open { .. } = self.state {
            tracing::warn!(reason, images = self.counter, "构建会话已中止");
        }
        self.state = SessionState::Aborted;
    }

    /// 在闭包中添加图片，闭包成功时完成构建，失败时中止并返回闭包的错误
    ///
    /// # 示例
    ///
    /// ```rust,no_run
    /// use comicforge::{BookMetadata, EpubBuilder};
    ///
    /// let path = EpubBuilder::scoped(BookMetadata::new("Test Book"), |builder| {
    ///     builder.add_image("cover.jpg")?;
    ///     builder.add_image("001.jpg")
    /// })?;
    /// println!("{}", path.display());
    /// # Ok::<(), comicforge::EpubError>(())
    /// ```
    pub fn scoped<F, E>(metadata: BookMetadata, f: F) -> std::result::Result<PathBuf, E>
    where
        F: FnOnce(&mut EpubBuilder) -> std::result::Result<(), E>,
        E: From<EpubError>,
    {
        Self::new(metadata)?.run(f)
    }

    /// 与`scoped`相同，但使用已经配置好的会话
    pub fn run<F, E>(mut self, f: F) -> std::result::Result<PathBuf, E>
    where
        F: FnOnce(&mut EpubBuilder) -> std::result::Result<(), E>,
        E: From<EpubError>,
    {
        match f(&mut self) {
            Ok(()) => Ok(self.finish()?),
            Err(err) => {
                self.abort();
                Err(err)
            }
        }
    }
}

impl Drop for EpubBuilder {
    fn drop(&mut self) {
        if let SessionState::Open { .. } = self.state {
            self.release("会话未完成即被丢弃");
        }
    }
}
