//! 清单模块
//!
//! 提供EPUB包中文件清单的结构定义。

use crate::epub::registry::ContentEntry;

/// 清单项信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestItem {
    /// 项目ID
    pub id: String,
    /// 文件路径(相对于OPF文件)
    pub href: String,
    /// 媒体类型
    pub media_type: String,
    /// 属性(如nav)
    pub properties: Option<String>,
}

impl ManifestItem {
    /// 创建新的清单项
    pub fn new(id: String, href: String, media_type: String) -> Self {
        Self {
            id,
            href,
            media_type,
            properties: None,
        }
    }

    /// 创建带属性的清单项
    pub fn with_properties(id: String, href: String, media_type: String, properties: String) -> Self {
        Self {
            id,
            href,
            media_type,
            properties: Some(properties),
        }
    }

    /// 导航文档
    pub fn nav() -> Self {
        Self::with_properties(
            "nav".to_string(),
            "nav.xhtml".to_string(),
            "application/xhtml+xml".to_string(),
            "nav".to_string(),
        )
    }

    /// 检查是否包含指定属性
    pub fn has_property(&self, property: &str) -> bool {
        self.properties
            .as_deref()
            .is_some_and(|properties| properties.split_whitespace().any(|p| p == property))
    }

    /// 检查是否为导航文档
    pub fn is_nav(&self) -> bool {
        self.has_property("nav")
    }

    /// 检查是否为图片文件
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }

    /// 检查是否为CSS文件
    pub fn is_css(&self) -> bool {
        self.media_type == "text/css"
    }

    /// 检查是否为XHTML文件
    pub fn is_xhtml(&self) -> bool {
        self.media_type == "application/xhtml+xml"
    }

    /// 检查是否为NCX文件
    pub fn is_ncx(&self) -> bool {
        self.media_type == "application/x-dtbncx+xml"
    }
}

impl From<&ContentEntry> for ManifestItem {
    fn from(entry: &ContentEntry) -> Self {
        Self::new(entry.symbolic_id.clone(), entry.href(), entry.media_type.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_content_entry() {
        let item = ManifestItem::from(&ContentEntry::image(2));
        assert_eq!(item.id, "img2");
        assert_eq!(item.href, "Image/2.jpg");
        assert!(item.is_image());
        assert!(!item.is_nav());
    }

    #[test]
    fn test_nav_item() {
        let item = ManifestItem::nav();
        assert!(item.is_nav());
        assert!(item.is_xhtml());
    }
}
