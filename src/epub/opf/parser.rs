//! OPF解析器模块
//!
//! 读取已生成的content.opf，还原元数据、清单和脊柱。

use crate::epub::error::{EpubError, Result};
use crate::epub::opf::{
    manifest::ManifestItem,
    metadata::BookMetadata,
    spine::SpineItem,
    writer::UNIQUE_IDENTIFIER_ID,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::collections::HashMap;

/// OPF文件解析结果
#[derive(Debug, Clone)]
pub struct Opf {
    /// EPUB版本
    pub version: String,
    /// 元数据
    pub metadata: BookMetadata,
    /// 唯一标识符(unique-identifier指向的dc:identifier)
    pub identifier: Option<String>,
    /// dcterms:modified
    pub modified: Option<String>,
    /// 清单项，保持文档中的顺序
    pub manifest: Vec<ManifestItem>,
    /// 脊柱(阅读顺序)
    pub spine: Vec<SpineItem>,
    /// 脊柱的目录引用
    pub spine_toc: Option<String>,
}

impl Opf {
    /// 解析OPF文件内容
    ///
    /// # 参数
    /// * `xml_content` - OPF文件的XML内容
    ///
    /// # 返回值
    /// * `Result<Opf, EpubError>` - 解析后的OPF信息
    pub fn parse_xml(xml_content: &str) -> Result<Opf> {
        let mut reader = Reader::from_str(xml_content);
        reader.config_mut().trim_text(true);
        reader.config_mut().expand_empty_elements = true;

        let mut version = String::new();
        let mut unique_identifier = String::from(UNIQUE_IDENTIFIER_ID);
        let mut metadata = BookMetadata::new(String::new());
        let mut identifiers: HashMap<String, String> = HashMap::new();
        let mut modified = None;
        let mut manifest = Vec::new();
        let mut spine = Vec::new();
        let mut spine_toc = None;

        let mut buf = Vec::new();
        let mut current_section = String::new();
        let mut text_content = String::new();
        let mut current_attributes: HashMap<String, String> = HashMap::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => {
                    let local_name_bytes = e.local_name();
                    let local_name = String::from_utf8_lossy(local_name_bytes.as_ref());

                    match local_name.as_ref() {
                        "package" => {
                            let attributes = Self::collect_attributes(e)?;
                            version = attributes.get("version").cloned().unwrap_or_default();
                            if let Some(id) = attributes.get("unique-identifier") {
                                unique_identifier = id.clone();
                            }
                        }
                        "metadata" | "manifest" => {
                            current_section = local_name.to_string();
                        }
                        "spine" => {
                            current_section = "spine".to_string();
                            spine_toc = Self::collect_attributes(e)?.get("toc").cloned();
                        }
                        "item" if current_section == "manifest" => {
                            Self::parse_manifest_item(e, &mut manifest)?;
                        }
                        "itemref" if current_section == "spine" => {
                            Self::parse_spine_item(e, &mut spine)?;
                        }
                        _ if current_section == "metadata" => {
                            current_attributes = Self::collect_attributes(e)?;
                            Self::apply_name_meta(&local_name, &current_attributes, &mut metadata);
                        }
                        _ => {}
                    }
                    text_content.clear();
                }
                Event::End(ref e) => {
                    let local_name_bytes = e.local_name();
                    let local_name = String::from_utf8_lossy(local_name_bytes.as_ref());
                    let content = text_content.trim().to_string();

                    match local_name.as_ref() {
                        "metadata" | "manifest" | "spine" => {
                            current_section.clear();
                        }
                        "title" if current_section == "metadata" => metadata.title = content,
                        "creator" if current_section == "metadata" => metadata.creator = Some(content),
                        "language" if current_section == "metadata" => metadata.language = content,
                        "identifier" if current_section == "metadata" => {
                            let id = current_attributes.get("id").cloned().unwrap_or_default();
                            identifiers.insert(id, content);
                        }
                        "meta" if current_section == "metadata" => {
                            if current_attributes.get("property").map(String::as_str)
                                == Some("dcterms:modified")
                            {
                                modified = Some(content);
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
            return Err(EpubError::OpfParseError("缺少package元素".to_string()));
        }

        Ok(Opf {
            version,
            metadata,
            identifier: identifiers.remove(&unique_identifier),
            modified,
            manifest,
            spine,
            spine_toc,
        })
    }

    /// 收集元素的所有属性
    fn collect_attributes(e: &BytesStart) -> Result<HashMap<String, String>> {
        let mut attributes = HashMap::new();
        for attr_result in e.attributes() {
            let attr = attr_result.map_err(|err| EpubError::XmlError(quick_xml::Error::InvalidAttr(err)))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = attr.unescape_value()?.to_string();
            attributes.insert(key, value);
        }
        Ok(attributes)
    }

    /// 处理calibre风格的name/content meta
    fn apply_name_meta(local_name: &str, attributes: &HashMap<String, String>, metadata: &mut BookMetadata) {
        if local_name != "meta" {
            return;
        }
        let (Some(name), Some(content)) = (attributes.get("name"), attributes.get("content")) else {
            return;
        };
        match name.as_str() {
            "calibre:title_sort" => metadata.title_sort = Some(content.clone()),
            "calibre:series" => metadata.series = Some(content.clone()),
            "calibre:series_index" => metadata.series_index = Some(content.clone()),
            _ => {}
        }
    }

    /// 解析清单项
    fn parse_manifest_item(e: &BytesStart, manifest: &mut Vec<ManifestItem>) -> Result<()> {
        let mut attributes = Self::collect_attributes(e)?;
        let (Some(id), Some(href), Some(media_type)) = (
            attributes.remove("id"),
            attributes.remove("href"),
            attributes.remove("media-type"),
        ) else {
            return Ok(());
        };

        manifest.push(ManifestItem {
            id,
            href,
            media_type,
            properties: attributes.remove("properties"),
        });
        Ok(())
    }

    /// 解析脊柱项
    fn parse_spine_item(e: &BytesStart, spine: &mut Vec<SpineItem>) -> Result<()> {
        let attributes = Self::collect_attributes(e)?;
        if let Some(idref) = attributes.get("idref") {
            spine.push(SpineItem {
                idref: idref.clone(),
                linear: attributes.get("linear").map(String::as_str) != Some("no"),
            });
        }
        Ok(())
    }

    /// 根据ID获取清单项
    pub fn get_manifest_item(&self, id: &str) -> Option<&ManifestItem> {
        self.manifest.iter().find(|item| item.id == id)
    }

    /// 获取导航文档的路径
    pub fn get_nav_path(&self) -> Option<String> {
        self.manifest
            .iter()
            .find(|item| item.is_nav())
            .map(|item| item.href.clone())
    }

    /// 获取NCX文件的路径
    pub fn get_ncx_path(&self) -> Option<String> {
        self.spine_toc
            .as_deref()
            .and_then(|toc| self.get_manifest_item(toc))
            .or_else(|| self.manifest.iter().find(|item| item.is_ncx()))
            .map(|item| item.href.clone())
    }

    /// 获取所有章节文件的路径(按阅读顺序)
    pub fn get_chapter_paths(&self) -> Vec<String> {
        self.spine
            .iter()
            .filter(|spine_item| spine_item.is_linear())
            .filter_map(|spine_item| self.get_manifest_item(&spine_item.idref))
            .map(|manifest_item| manifest_item.href.clone())
            .collect()
    }

    /// 获取所有图片文件路径(按清单顺序)
    pub fn get_image_paths(&self) -> Vec<String> {
        self.manifest
            .iter()
            .filter(|item| item.is_image())
            .map(|item| item.href.clone())
            .collect()
    }

    /// 获取所有CSS文件路径
    pub fn get_css_paths(&self) -> Vec<String> {
        self.manifest
            .iter()
            .filter(|item| item.is_css())
            .map(|item| item.href.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_OPF: &str = r#"<?xml version="1.0"?>
<package xmlns="http://www.idpf.org/2007/opf" unique-identifier="uuid_id" version="3.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:calibre="http://calibre.kovidgoyal.net/2009/metadata">
    <dc:language>zh-CN</dc:language>
    <dc:creator>Test Author</dc:creator>
    <meta name="calibre:title_sort" content="Book, Sample"/>
    <meta property="dcterms:modified">2024-01-01T00:00:00Z</meta>
    <dc:title>Sample &amp; Book</dc:title>
    <meta name="calibre:series" content="Saga"/>
    <meta name="calibre:series_index" content="2"/>
    <dc:identifier id="uuid_id">urn:uuid:1234</dc:identifier>
  </metadata>
  <manifest>
    <item id="nav" href="nav.xhtml" media-type="application/xhtml+xml" properties="nav"/>
    <item id="html0" href="0.xhtml" media-type="application/xhtml+xml"/>
    <item id="img0" href="Image/0.jpg" media-type="image/jpeg"/>
    <item id="html1" href="1.xhtml" media-type="application/xhtml+xml"/>
    <item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
  </manifest>
  <spine toc="ncx">
    <itemref idref="html1"/>
    <itemref idref="html0"/>
  </spine>
</package>"#;

    #[test]
    fn test_parse_metadata() {
        let opf = Opf::parse_xml(SAMPLE_OPF).expect("解析OPF失败");
        assert_eq!(opf.version, "3.0");
        assert_eq!(opf.metadata.title, "Sample & Book");
        assert_eq!(opf.metadata.creator(), "Test Author");
        assert_eq!(opf.metadata.title_sort(), "Book, Sample");
        assert_eq!(opf.metadata.series.as_deref(), Some("Saga"));
        assert_eq!(opf.metadata.series_index.as_deref(), Some("2"));
        assert_eq!(opf.identifier.as_deref(), Some("urn:uuid:1234"));
        assert_eq!(opf.modified.as_deref(), Some("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn test_parse_manifest_and_spine() {
        let opf = Opf::parse_xml(SAMPLE_OPF).unwrap();
        assert_eq!(opf.manifest.len(), 5);
        assert_eq!(opf.manifest[1].id, "html0");
        assert_eq!(opf.get_chapter_paths(), vec!["1.xhtml", "0.xhtml"]);
        assert_eq!(opf.get_nav_path().as_deref(), Some("nav.xhtml"));
        assert_eq!(opf.get_ncx_path().as_deref(), Some("toc.ncx"));
        assert_eq!(opf.get_image_paths(), vec!["Image/0.jpg"]);
        assert!(opf.get_css_paths().is_empty());
    }

    #[test]
    fn test_missing_package_is_error() {
        assert!(matches!(
            Opf::parse_xml("<metadata/>"),
            Err(EpubError::OpfParseError(_))
        ));
    }
}
