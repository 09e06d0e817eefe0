//! EPUB包写入模块
//!
//! 在内存中维护zip归档：先写入固定的mimetype与container.xml，
//! 之后按调用顺序追加条目，最后一次性写入目标文件。

use crate::epub::container::{CONTAINER_PATH, Container, OPF_PATH};
use crate::epub::error::{EpubError, Result};
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::Builder;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// mimetype条目路径
pub const MIMETYPE_PATH: &str = "mimetype";

/// mimetype条目内容
pub const EPUB_MIMETYPE: &str = "application/epub+zip";

/// 内存中的EPUB归档
pub struct PackageWriter {
    zip: Option<ZipWriter<Cursor<Vec<u8>>>>,
    deflated: SimpleFileOptions,
    entries: Vec<String>,
}

impl PackageWriter {
    /// 创建写入器
    ///
    /// # 参数
    /// * `compression_level` - deflate压缩级别，None表示使用zip的默认级别
    pub fn new(compression_level: Option<i64>) -> Self {
        Self {
            zip: None,
            deflated: SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .compression_level(compression_level),
            entries: Vec::new(),
        }
    }

    /// 归档是否已经创建
    pub fn is_open(&self) -> bool {
        self.zip.is_some()
    }

    /// 创建归档并写入mimetype和container.xml，重复调用无效果
    pub fn open(&mut self) -> Result<()> {
        if self.zip.is_some() {
            return Ok(());
        }

        self.zip = Some(ZipWriter::new(Cursor::new(Vec::new())));
        self.write_entry(MIMETYPE_PATH, EPUB_MIMETYPE.as_bytes(), true)?;
        let container = Container::for_package(OPF_PATH).render()?;
        self.write_entry(CONTAINER_PATH, &container, false)?;
        tracing::debug!("已创建内存归档");
        Ok(())
    }

    /// 追加一个条目
    ///
    /// # 参数
    /// * `path` - 归档内路径
    /// * `bytes` - 条目内容
    /// * `stored` - 为true时不压缩
    pub fn write_entry(&mut self, path: &str, bytes: &[u8], stored: bool) -> Result<()> {
        if self.zip.is_none() {
            self.open()?;
        }
        let options = if stored {
            SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
        } else {
            self.deflated
        };

        let zip = self
            .zip
            .as_mut()
            .ok_or(EpubError::InvalidState { state: "未打开", operation: "写入条目" })?;
        zip.start_file(path, options)?;
        zip.write_all(bytes)?;
        self.entries.push(path.to_string());
        tracing::trace!(path, size = bytes.len(), stored, "写入条目");
        Ok(())
    }

    /// 已写入条目的路径，按物理顺序
    pub fn entry_names(&self) -> &[String] {
        &self.entries
    }

    /// 结束归档，返回完整的zip字节
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let zip = self
            .zip
            .take()
            .ok_or(EpubError::InvalidState { state: "未打开", operation: "结束归档" })?;
        Ok(zip.finish()?.into_inner())
    }

    /// 结束归档并写入目标文件，已存在的文件会被覆盖
    ///
    /// 先写入同目录下的临时文件再重命名，失败时不会留下不完整的文件。
    pub fn finalize_and_persist(self, output: &Path) -> Result<()> {
        let bytes = self.finish()?;
        let write_error = |source| EpubError::Write {
            path: output.to_path_buf(),
            source,
        };

        let parent = output
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut temp = Builder::new()
            .prefix(".comicforge")
            .suffix(".part")
            .tempfile_in(parent)
            .map_err(write_error)?;
        temp.write_all(&bytes).map_err(write_error)?;
        temp.as_file().sync_all().map_err(write_error)?;
        temp.persist(output).map_err(|err| write_error(err.error))?;

        tracing::info!(path = %output.display(), size = bytes.len(), "EPUB已写入");
        Ok(())
    }
}

impl Default for PackageWriter {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn read_back(bytes: Vec<u8>) -> ZipArchive<Cursor<Vec<u8>>> {
        ZipArchive::new(Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn test_open_writes_leading_entries() {
        let mut writer = PackageWriter::default();
        writer.open().unwrap();
        writer.open().unwrap();
        assert_eq!(writer.entry_names(), &["mimetype", "META-INF/container.xml"]);

        let mut archive = read_back(writer.finish().unwrap());
        assert_eq!(archive.len(), 2);

        let mut mimetype = archive.by_index(0).unwrap();
        assert_eq!(mimetype.name(), "mimetype");
        assert_eq!(mimetype.compression(), CompressionMethod::Stored);
        let mut content = String::new();
        mimetype.read_to_string(&mut content).unwrap();
        assert_eq!(content, "application/epub+zip");
    }

    #[test]
    fn test_entries_keep_call_order() {
        let mut writer = PackageWriter::new(Some(9));
        writer.write_entry("OEBPS/b.txt", b"b", false).unwrap();
        writer.write_entry("OEBPS/a.txt", b"a", false).unwrap();
        writer.write_entry("OEBPS/c.txt", b"c", true).unwrap();

        let mut archive = read_back(writer.finish().unwrap());
        let names: Vec<_> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["mimetype", "META-INF/container.xml", "OEBPS/b.txt", "OEBPS/a.txt", "OEBPS/c.txt"]
        );
        assert_eq!(archive.by_index(2).unwrap().compression(), CompressionMethod::Deflated);
        assert_eq!(archive.by_index(4).unwrap().compression(), CompressionMethod::Stored);
    }

    #[test]
    fn test_finish_without_open_is_an_error() {
        assert!(matches!(
            PackageWriter::default().finish(),
            Err(EpubError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_persist_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("book.epub");
        std::fs::write(&output, b"old").unwrap();

        let mut writer = PackageWriter::default();
        writer.open().unwrap();
        writer.finalize_and_persist(&output).unwrap();

        let archive = ZipArchive::new(std::fs::File::open(&output).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);
        // 临时文件已被重命名
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_persist_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("missing").join("book.epub");

        let mut writer = PackageWriter::default();
        writer.open().unwrap();
        let err = writer.finalize_and_persist(&output).unwrap_err();
        assert!(matches!(err, EpubError::Write { .. }));
        assert!(!output.exists());
    }
}
