//! NCX解析器模块
//!
//! 提供NCX（Navigation Control file for XML）文件的XML解析功能。

use crate::epub::error::{EpubError, Result};
use crate::epub::ncx::{DocTitle, NavContent, NavLabel, NavMap, NavPoint, NcxMetadata};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

/// NCX文件解析结果
#[derive(Debug, Clone)]
pub struct Ncx {
    /// NCX版本
    pub version: String,
    /// XML语言
    pub xml_lang: Option<String>,
    /// 元数据
    pub metadata: NcxMetadata,
    /// 文档标题
    pub doc_title: Option<DocTitle>,
    /// 导航地图
    pub nav_map: NavMap,
}

impl Ncx {
    /// 解析NCX文件内容
    ///
    /// # 参数
    /// * `xml_content` - NCX文件的XML内容
    ///
    /// # 返回值
    /// * `Result<Ncx, EpubError>` - 解析后的NCX信息
    pub fn parse_xml(xml_content: &str) -> Result<Ncx> {
        let mut reader = Reader::from_str(xml_content);
        reader.config_mut().trim_text(true);
        reader.config_mut().expand_empty_elements = true;

        let mut version = String::new();
        let mut xml_lang = None;
        let mut metadata = NcxMetadata::default();
        let mut doc_title = None;
        let mut nav_map = NavMap::new();

        let mut buf = Vec::new();
        let mut current_section = String::new();
        let mut text_content = String::new();

        // 导航点解析状态
        let mut nav_point_stack: Vec<NavPoint> = Vec::new();
        let mut current_nav_point: Option<NavPoint> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => {
                    let local_name_bytes = e.local_name();
                    let local_name = String::from_utf8_lossy(local_name_bytes.as_ref());

                    match local_name.as_ref() {
                        "ncx" => {
                            version = Self::attribute(e, b"version")?.unwrap_or_default();
                            xml_lang = Self::attribute(e, b"xml:lang")?;
                        }
                        "head" | "docTitle" | "navMap" => {
                            current_section = local_name.to_string();
                        }
                        "meta" if current_section == "head" => {
                            Self::parse_meta_element(e, &mut metadata)?;
                        }
                        "navPoint" if current_section == "navMap" => {
                            let id = Self::attribute(e, b"id")?.unwrap_or_default();
                            let play_order = Self::attribute(e, b"playOrder")?
                                .and_then(|value| value.parse().ok())
                                .unwrap_or(0);

                            // 如果当前有未完成的导航点，将其推入栈中
                            if let Some(nav_point) = current_nav_point.take() {
                                nav_point_stack.push(nav_point);
                            }

                            current_nav_point = Some(NavPoint::new(
                                id,
                                play_order,
                                NavLabel::new(String::new()),
                                NavContent::new(String::new()),
                            ));
                        }
                        "content" if current_section == "navMap" => {
                            let src = Self::attribute(e, b"src")?.unwrap_or_default();
                            if let Some(nav_point) = current_nav_point.as_mut() {
                                nav_point.content = NavContent::new(src);
                            }
                        }
                        _ => {}
                    }
                    text_content.clear();
                }
                Event::End(ref e) => {
                    let local_name_bytes = e.local_name();
                    let local_name = String::from_utf8_lossy(local_name_bytes.as_ref());

                    match local_name.as_ref() {
                        "head" | "navMap" => {
                            current_section.clear();
                        }
                        "docTitle" => {
                            current_section.clear();
                        }
                        "text" if current_section == "docTitle" => {
                            doc_title = Some(DocTitle::new(text_content.trim().to_string()));
                        }
                        "text" if current_section == "navMap" => {
                            if let Some(nav_point) = current_nav_point.as_mut() {
                                nav_point.nav_label = NavLabel::new(text_content.trim().to_string());
                            }
                        }
                        "navPoint" if current_section == "navMap" => {
                            if let Some(nav_point) = current_nav_point.take() {
                                if let Some(mut parent) = nav_point_stack.pop() {
                                    parent.add_child(nav_point);
                                    current_nav_point = Some(parent);
                                } else {
                                    nav_map.add_nav_point(nav_point);
                                }
                            }
                        }
                        _ => {}
                    }
                    text_content.clear();
                }
                Event::Text(e) => {
                    text_content.push_str(&e.unescape()?);
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if version.is_empty() {
            return Err(EpubError::NcxParseError("缺少ncx根元素".to_string()));
        }

        Ok(Ncx {
            version,
            xml_lang,
            metadata,
            doc_title,
            nav_map,
        })
    }

    /// 读取单个属性值
    fn attribute(e: &BytesStart, name: &[u8]) -> Result<Option<String>> {
        for attr_result in e.attributes() {
            let attr = attr_result.map_err(|err| EpubError::XmlError(quick_xml::Error::InvalidAttr(err)))?;
            if attr.key.as_ref() == name {
                return Ok(Some(attr.unescape_value()?.to_string()));
            }
        }
        Ok(None)
    }

    /// 解析meta元素
    fn parse_meta_element(e: &BytesStart, metadata: &mut NcxMetadata) -> Result<()> {
        let name = Self::attribute(e, b"name")?.unwrap_or_default();
        let content = Self::attribute(e, b"content")?.unwrap_or_default();

        match name.as_str() {
            "dtb:uid" => metadata.uid = Some(content),
            "dtb:depth" => metadata.depth = content.parse().ok(),
            "dtb:generator" => metadata.generator = Some(content),
            "dtb:totalPageCount" => metadata.total_page_count = content.parse().ok(),
            "dtb:maxPageNumber" => metadata.max_page_number = content.parse().ok(),
            _ => {
                metadata.other_metadata.insert(name, content);
            }
        }

        Ok(())
    }

    /// 获取NCX文件的唯一标识符
    pub fn get_uid(&self) -> Option<&str> {
        self.metadata.uid.as_deref()
    }

    /// 获取文档标题文本
    pub fn get_title(&self) -> Option<&str> {
        self.doc_title.as_ref().map(|title| title.text.as_str())
    }

    /// 获取所有导航点的平铺列表
    pub fn get_all_nav_points(&self) -> Vec<&NavPoint> {
        self.nav_map.get_all_nav_points()
    }
}
