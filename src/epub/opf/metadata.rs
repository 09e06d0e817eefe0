//! 元数据模块
//!
//! 书籍的基本描述信息：书名、作者、系列等。

use crate::epub::error::{EpubError, Result};

/// 未指定作者时使用的占位名
pub const UNKNOWN_CREATOR: &str = "Unknown";

/// 默认语言
pub const DEFAULT_LANGUAGE: &str = "zh-CN";

/// 书籍元数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookMetadata {
    /// 书名
    pub title: String,
    /// 排序用书名(为空时使用书名)
    pub title_sort: Option<String>,
    /// 作者(为空时使用"Unknown")
    pub creator: Option<String>,
    /// 系列名
    pub series: Option<String>,
    /// 系列序号
    pub series_index: Option<String>,
    /// 语言
    pub language: String,
}

impl BookMetadata {
    /// 创建新的元数据
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            title_sort: None,
            creator: None,
            series: None,
            series_index: None,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    pub fn with_title_sort(mut self, title_sort: impl Into<String>) -> Self {
        self.title_sort = Some(title_sort.into());
        self
    }

    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    /// 设置系列名与序号
    pub fn with_series(mut self, series: impl Into<String>, index: Option<String>) -> Self {
        self.series = Some(series.into());
        self.series_index = index;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// 检查元数据是否完整
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(EpubError::MissingTitle);
        }
        Ok(())
    }

    /// 排序用书名
    pub fn title_sort(&self) -> &str {
        self.title_sort
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.title)
    }

    /// 作者
    pub fn creator(&self) -> &str {
        self.creator
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_CREATOR)
    }

    /// 由书名得到的默认输出文件名
    ///
    /// 只把空格替换为下划线，不会过滤其他文件系统不允许的字符。
    pub fn default_file_name(&self) -> String {
        format!("{}.epub", self.title.replace(' ', "_"))
    }
}
