//! NCX导航元素数据结构定义
//!
//! 定义NCX文件中的导航元素：元数据、文档标题、导航点、导航地图。

use std::collections::HashMap;

/// NCX元数据信息
#[derive(Debug, Clone, Default)]
pub struct NcxMetadata {
    /// 唯一标识符（dtb:uid）
    pub uid: Option<String>,
    /// 导航深度（dtb:depth）
    pub depth: Option<u32>,
    /// 生成器（dtb:generator）
    pub generator: Option<String>,
    /// 总页数（dtb:totalPageCount）
    pub total_page_count: Option<u32>,
    /// 最大页码（dtb:maxPageNumber）
    pub max_page_number: Option<u32>,
    /// 其他元数据
    pub other_metadata: HashMap<String, String>,
}

/// 文档标题
#[derive(Debug, Clone)]
pub struct DocTitle {
    /// 标题文本
    pub text: String,
}

impl DocTitle {
    pub fn new(text: String) -> Self {
        Self { text }
    }
}

/// 导航标签
#[derive(Debug, Clone)]
pub struct NavLabel {
    /// 标签文本
    pub text: String,
}

impl NavLabel {
    pub fn new(text: String) -> Self {
        Self { text }
    }
}

/// 导航内容引用
#[derive(Debug, Clone)]
pub struct NavContent {
    /// 源文件路径
    pub src: String,
}

impl NavContent {
    pub fn new(src: String) -> Self {
        Self { src }
    }
}

/// 导航点
#[derive(Debug, Clone)]
pub struct NavPoint {
    /// 唯一标识符
    pub id: String,
    /// 播放顺序
    pub play_order: u32,
    /// 导航标签
    pub nav_label: NavLabel,
    /// 内容引用
    pub content: NavContent,
    /// 子导航点
    pub children: Vec<NavPoint>,
}

impl NavPoint {
    /// 创建新的导航点
    pub fn new(id: String, play_order: u32, nav_label: NavLabel, content: NavContent) -> Self {
        Self {
            id,
            play_order,
            nav_label,
            content,
            children: Vec::new(),
        }
    }

    /// 添加子导航点
    pub fn add_child(&mut self, child: NavPoint) {
        self.children.push(child);
    }

    /// 获取所有导航点（包括子导航点）的平铺列表
    pub fn get_all_nav_points(&self) -> Vec<&NavPoint> {
        let mut points = vec![self];
        for child in &self.children {
            points.extend(child.get_all_nav_points());
        }
        points
    }
}

/// 导航地图
#[derive(Debug, Clone, Default)]
pub struct NavMap {
    /// 导航点列表
    pub nav_points: Vec<NavPoint>,
}

impl NavMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加导航点
    pub fn add_nav_point(&mut self, nav_point: NavPoint) {
        self.nav_points.push(nav_point);
    }

    /// 获取所有导航点的平铺列表
    pub fn get_all_nav_points(&self) -> Vec<&NavPoint> {
        self.nav_points
            .iter()
            .flat_map(|nav_point| nav_point.get_all_nav_points())
            .collect()
    }
}
