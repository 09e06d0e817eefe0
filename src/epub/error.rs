use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EpubError>;

/// Epub相关的错误类型
#[derive(Error, Debug)]
pub enum EpubError {
    #[error("IO错误: {0}")]
    Io(#[from] io::Error),

    #[error("Zip文件错误: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML错误: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("缺少书名")]
    MissingTitle,

    #[error("没有添加任何图片")]
    NoImages,

    #[error("无法读取图片 {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("无法写入输出文件 {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("会话状态错误: 当前状态为{state}, 不能执行{operation}")]
    InvalidState {
        state: &'static str,
        operation: &'static str,
    },

    #[error("文件不是有效的EPUB格式: {0}")]
    InvalidEpub(String),

    #[error("缺少mimetype文件")]
    MissingMimetype,

    #[error("无效的mimetype: {expected}, 找到: {found}")]
    InvalidMimetype { expected: String, found: String },

    #[error("container.xml解析错误: {0}")]
    ContainerParseError(String),

    #[error("OPF文件解析错误: {0}")]
    OpfParseError(String),

    #[error("NCX文件解析错误: {0}")]
    NcxParseError(String),

    #[error("配置文件错误: {0}")]
    ConfigError(String),
}

impl EpubError {
    /// 是否为前置条件错误（尚未创建任何归档内容）
    pub fn is_precondition(&self) -> bool {
        matches!(self, EpubError::MissingTitle | EpubError::NoImages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_classification() {
        assert!(EpubError::MissingTitle.is_precondition());
        assert!(EpubError::NoImages.is_precondition());
        assert!(!EpubError::MissingMimetype.is_precondition());
    }

    #[test]
    fn test_image_read_message_names_path() {
        let err = EpubError::ImageRead {
            path: PathBuf::from("pages/1.jpg"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("pages/1.jpg"));
    }
}
