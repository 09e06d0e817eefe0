//! 内容登记模块
//!
//! 按写入顺序记录放入EPUB包中的每一个条目。登记顺序就是阅读顺序，
//! OPF的manifest/spine以及导航文档都由它生成。

use std::collections::HashSet;

/// OEBPS目录前缀
pub const OEBPS_DIR: &str = "OEBPS";

/// 条目类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// XHTML内容页
    Html,
    /// 图片
    Image,
    /// 样式表
    Css,
    /// NCX导航文件
    Ncx,
}

/// 一个已写入包中的条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEntry {
    /// 条目文件名（不含子目录）
    pub internal_name: String,
    /// manifest中的id
    pub symbolic_id: String,
    /// 媒体类型
    pub media_type: String,
    /// 条目类型
    pub kind: ContentKind,
}

impl ContentEntry {
    /// 第`index`张图片对应的内容页
    pub fn page(index: usize) -> Self {
        Self {
            internal_name: format!("{}.xhtml", index),
            symbolic_id: format!("html{}", index),
            media_type: "application/xhtml+xml".to_string(),
            kind: ContentKind::Html,
        }
    }

    /// 第`index`张图片
    pub fn image(index: usize) -> Self {
        Self {
            internal_name: format!("{}.jpg", index),
            symbolic_id: format!("img{}", index),
            media_type: "image/jpeg".to_string(),
            kind: ContentKind::Image,
        }
    }

    /// 样式表
    pub fn stylesheet() -> Self {
        Self {
            internal_name: "stylesheet.css".to_string(),
            symbolic_id: "css".to_string(),
            media_type: "text/css".to_string(),
            kind: ContentKind::Css,
        }
    }

    /// NCX导航文件
    pub fn ncx() -> Self {
        Self {
            internal_name: "toc.ncx".to_string(),
            symbolic_id: "ncx".to_string(),
            media_type: "application/x-dtbncx+xml".to_string(),
            kind: ContentKind::Ncx,
        }
    }

    /// 相对于OPF文件的路径
    pub fn href(&self) -> String {
        match self.kind {
            ContentKind::Image => format!("Image/{}", self.internal_name),
            ContentKind::Css => format!("CSS/{}", self.internal_name),
            ContentKind::Html | ContentKind::Ncx => self.internal_name.clone(),
        }
    }

    /// 在zip归档中的完整路径
    pub fn archive_path(&self) -> String {
        format!("{}/{}", OEBPS_DIR, self.href())
    }
}

/// 只追加的条目登记表
#[derive(Debug, Default, Clone)]
pub struct ContentRegistry {
    entries: Vec<ContentEntry>,
    ids: HashSet<String>,
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个条目
    pub fn register(&mut self, entry: ContentEntry) {
        let fresh = self.ids.insert(entry.symbolic_id.clone());
        debug_assert!(fresh, "重复的manifest id: {}", entry.symbolic_id);
        self.entries.push(entry);
    }

    /// 按登记顺序遍历指定类型的条目，可重复调用
    pub fn entries_of_kind(&self, kind: ContentKind) -> impl Iterator<Item = &ContentEntry> + '_ {
        self.entries.iter().filter(move |entry| entry.kind == kind)
    }

    /// 指定类型的第一个条目
    pub fn first_of_kind(&self, kind: ContentKind) -> Option<&ContentEntry> {
        self.entries_of_kind(kind).next()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContentEntry> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
