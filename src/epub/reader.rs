use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::{CompressionMethod, ZipArchive};

use crate::epub::container::{CONTAINER_PATH, Container};
use crate::epub::error::{EpubError, Result};
use crate::epub::nav::{NavLink, parse_nav_links};
use crate::epub::ncx::Ncx;
use crate::epub::opf::Opf;
use crate::epub::package::{EPUB_MIMETYPE, MIMETYPE_PATH};
use crate::epub::page::parse_image_src;

/// 书籍概要信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookInfo {
    /// 书名
    pub title: String,
    /// 作者
    pub creator: String,
    /// 语言
    pub language: String,
    /// 唯一标识符
    pub identifier: Option<String>,
    /// 系列名
    pub series: Option<String>,
    /// 系列序号
    pub series_index: Option<String>,
    /// 脊柱中的页面数量
    pub page_count: usize,
    /// 清单中的图片数量
    pub image_count: usize,
}

/// 表示一个EPUB文件
pub struct Epub {
    archive: ZipArchive<File>,
}

impl Epub {
    /// 从文件路径创建Epub实例
    ///
    /// # 参数
    /// * `path` - epub文件的路径
    ///
    /// # 返回值
    /// * `Result<Epub, EpubError>` - 成功返回Epub实例，失败返回错误
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Epub> {
        let file = File::open(path)?;
        let archive = ZipArchive::new(file)?;

        let mut epub = Epub { archive };
        epub.validate()?;

        Ok(epub)
    }

    /// 验证EPUB文件的合法性
    ///
    /// 检查步骤：
    /// 1. 第一个条目必须是mimetype
    /// 2. mimetype不能被压缩
    /// 3. mimetype的内容必须是"application/epub+zip"
    fn validate(&mut self) -> Result<()> {
        if self.archive.len() == 0 {
            return Err(EpubError::MissingMimetype);
        }

        let (name, compression) = {
            let first = self.archive.by_index(0)?;
            (first.name().to_string(), first.compression())
        };
        if name != MIMETYPE_PATH {
            return Err(if self.has_mimetype_elsewhere() {
                EpubError::InvalidEpub("mimetype必须是第一个条目".to_string())
            } else {
                EpubError::MissingMimetype
            });
        }
        if compression != CompressionMethod::Stored {
            return Err(EpubError::InvalidEpub("mimetype不能被压缩".to_string()));
        }

        let mut content = String::new();
        self.archive.by_index(0)?.read_to_string(&mut content)?;
        if content != EPUB_MIMETYPE {
            return Err(EpubError::InvalidMimetype {
                expected: EPUB_MIMETYPE.to_string(),
                found: content,
            });
        }

        tracing::debug!("EPUB验证成功: mimetype文件正确");
        Ok(())
    }

    fn has_mimetype_elsewhere(&self) -> bool {
        self.archive.file_names().any(|name| name == MIMETYPE_PATH)
    }

    /// 列出EPUB文件中的所有条目，按物理顺序
    pub fn list_files(&mut self) -> Result<Vec<String>> {
        let mut files = Vec::new();

        for i in 0..self.archive.len() {
            let file = self.archive.by_index(i)?;
            files.push(file.name().to_string());
        }

        Ok(files)
    }

    /// 提取指定文件的内容
    ///
    /// # 参数
    /// * `filename` - 要提取的文件名
    ///
    /// # 返回值
    /// * `Result<String, EpubError>` - 文件内容
    pub fn extract_file(&mut self, filename: &str) -> Result<String> {
        let mut file = self.archive.by_name(filename)?;
        let mut content = String::new();
        file.read_to_string(&mut content)?;
        Ok(content)
    }

    /// 提取指定文件的二进制内容
    pub fn extract_binary_file(&mut self, filename: &str) -> Result<Vec<u8>> {
        let mut file = self.archive.by_name(filename)?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        Ok(buffer)
    }

    /// 解析container.xml文件
    pub fn parse_container(&mut self) -> Result<Container> {
        let container_content = self.extract_file(CONTAINER_PATH)?;
        Container::parse_xml(&container_content)
    }

    /// 获取主要的OPF文件路径
    ///
    /// # 返回值
    /// * `Result<String, EpubError>` - OPF文件的完整路径
    pub fn get_opf_path(&mut self) -> Result<String> {
        let container = self.parse_container()?;

        container.get_opf_path().ok_or_else(|| {
            EpubError::ContainerParseError("container.xml中没有找到有效的rootfile".to_string())
        })
    }

    /// 获取OPF文件所在的目录
    pub fn get_opf_directory(&mut self) -> Result<String> {
        let opf_path = self.get_opf_path()?;
        Ok(parent_dir(&opf_path).to_string())
    }

    /// 解析OPF文件
    pub fn parse_opf(&mut self) -> Result<Opf> {
        let opf_path = self.get_opf_path()?;
        let opf_content = self.extract_file(&opf_path)?;

        Opf::parse_xml(&opf_content).map_err(|e| match e {
            EpubError::XmlError(xml_err) => EpubError::OpfParseError(format!("XML解析错误: {}", xml_err)),
            other => other,
        })
    }

    /// 解析NCX文件，OPF中没有声明NCX时返回None
    pub fn parse_ncx(&mut self) -> Result<Option<Ncx>> {
        let opf = self.parse_opf()?;
        let Some(ncx_href) = opf.get_ncx_path() else {
            return Ok(None);
        };
        let ncx_path = join_path(&self.get_opf_directory()?, &ncx_href);
        let content = self.extract_file(&ncx_path)?;

        Ncx::parse_xml(&content).map(Some).map_err(|e| match e {
            EpubError::XmlError(xml_err) => EpubError::NcxParseError(format!("XML解析错误: {}", xml_err)),
            other => other,
        })
    }

    /// 读取导航文档中的链接，OPF中没有声明导航文档时返回空列表
    pub fn nav_links(&mut self) -> Result<Vec<NavLink>> {
        let opf = self.parse_opf()?;
        let Some(nav_href) = opf.get_nav_path() else {
            return Ok(Vec::new());
        };
        let nav_path = join_path(&self.get_opf_directory()?, &nav_href);
        let content = self.extract_file(&nav_path)?;
        parse_nav_links(&content)
    }

    /// 按阅读顺序列出每个页面引用的图片在归档中的路径
    ///
    /// 没有图片的页面会被跳过。
    pub fn page_images(&mut self) -> Result<Vec<String>> {
        let opf = self.parse_opf()?;
        let opf_dir = self.get_opf_directory()?;

        let mut images = Vec::new();
        for page_href in opf.get_chapter_paths() {
            let page_path = join_path(&opf_dir, &page_href);
            let content = self.extract_file(&page_path)?;
            if let Some(src) = parse_image_src(&content)? {
                images.push(join_path(parent_dir(&page_path), &src));
            }
        }
        Ok(images)
    }

    /// 获取书籍的基本信息
    pub fn get_book_info(&mut self) -> Result<BookInfo> {
        let opf = self.parse_opf()?;
        let page_count = opf.get_chapter_paths().len();
        let image_count = opf.get_image_paths().len();
        let creator = opf.metadata.creator().to_string();

        Ok(BookInfo {
            title: opf.metadata.title,
            creator,
            language: opf.metadata.language,
            identifier: opf.identifier,
            series: opf.metadata.series,
            series_index: opf.metadata.series_index,
            page_count,
            image_count,
        })
    }
}

/// 归档内路径的目录部分
fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// 拼接归档内路径
fn join_path(dir: &str, href: &str) -> String {
    if dir.is_empty() {
        href.to_string()
    } else {
        format!("{}/{}", dir, href)
    }
}
