//! EPUB3导航文档模块
//!
//! 生成nav.xhtml：按阅读顺序为每个内容页生成一个"Page N"链接；
//! 同时提供读取链接列表的解析函数。

use crate::epub::error::{EpubError, Result};
use crate::epub::page::STYLESHEET_HREF;
use crate::epub::registry::{ContentKind, ContentRegistry};
use crate::epub::xml::{XmlDocument, ns};
use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// 导航文档在OEBPS中的文件名
pub const NAV_NAME: &str = "nav.xhtml";

/// 导航文档中的一个链接
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub href: String,
    pub label: String,
}

/// 第`position`页(从1开始)的标签
pub fn page_label(position: usize) -> String {
    format!("Page {}", position)
}

/// 生成nav.xhtml
pub fn render_nav(registry: &ContentRegistry) -> Result<Vec<u8>> {
    let mut doc = XmlDocument::new()?;
    doc.doctype("html")?;
    doc.start("html", &[("xmlns", ns::XHTML), ("xmlns:epub", ns::OPS)])?;

    doc.start("head", &[])?;
    doc.empty(
        "meta",
        &[("http-equiv", "default-style"), ("content", "text/html; charset=utf-8")],
    )?;
    doc.text_element("title", &[], "Contents")?;
    doc.empty(
        "link",
        &[("rel", "stylesheet"), ("href", STYLESHEET_HREF), ("type", "text/css")],
    )?;
    doc.end("head")?;

    doc.start("body", &[])?;
    doc.start("nav", &[("epub:type", "toc"), ("id", "toc")])?;
    doc.text_element("h2", &[], "Contents")?;
    doc.start("ol", &[])?;
    for (index, page) in registry.entries_of_kind(ContentKind::Html).enumerate() {
        let href = page.href();
        doc.start("li", &[])?;
        doc.text_element("a", &[("href", href.as_str())], &page_label(index + 1))?;
        doc.end("li")?;
    }
    doc.end("ol")?;
    doc.end("nav")?;
    doc.end("body")?;

    doc.end("html")?;
    Ok(doc.finish())
}

/// 解析导航文档中toc导航的链接列表
pub fn parse_nav_links(xml_content: &str) -> Result<Vec<NavLink>> {
    let mut reader = Reader::from_str(xml_content);
    reader.config_mut().trim_text(true);
    reader.config_mut().expand_empty_elements = true;

    let mut links = Vec::new();
    let mut buf = Vec::new();
    let mut in_toc = false;
    let mut current_href: Option<String> = None;
    let mut text_content = String::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"nav" => {
                    for attr_result in e.attributes() {
                        let attr = attr_result
                            .map_err(|err| EpubError::XmlError(quick_xml::Error::InvalidAttr(err)))?;
                        if attr.key.as_ref() == b"epub:type" && attr.value.as_ref() == b"toc" {
                            in_toc = true;
                        }
                    }
                }
                b"a" if in_toc => {
                    for attr_result in e.attributes() {
                        let attr = attr_result
                            .map_err(|err| EpubError::XmlError(quick_xml::Error::InvalidAttr(err)))?;
                        if attr.key.as_ref() == b"href" {
                            current_href = Some(attr.unescape_value()?.to_string());
                        }
                    }
                    text_content.clear();
                }
                _ => {}
            },
            Event::End(ref e) => match e.local_name().as_ref() {
                b"nav" => in_toc = false,
                b"a" => {
                    if let Some(href) = current_href.take() {
                        links.push(NavLink {
                            href,
                            label: text_content.trim().to_string(),
                        });
                    }
                }
                _ => {}
            },
            Event::Text(e) => {
                text_content.push_str(&e.unescape()?);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epub::registry::ContentEntry;

    #[test]
    fn test_labels_follow_registry_order() {
        let mut registry = ContentRegistry::new();
        for index in 0..3 {
            registry.register(ContentEntry::page(index));
            registry.register(ContentEntry::image(index));
        }

        let xml = render_nav(&registry).unwrap();
        let xml = String::from_utf8(xml).unwrap();
        assert!(xml.contains("<!DOCTYPE html>"));
        assert!(xml.contains(r#"epub:type="toc""#));

        let links = parse_nav_links(&xml).unwrap();
        assert_eq!(
            links,
            vec![
                NavLink { href: "0.xhtml".to_string(), label: "Page 1".to_string() },
                NavLink { href: "1.xhtml".to_string(), label: "Page 2".to_string() },
                NavLink { href: "2.xhtml".to_string(), label: "Page 3".to_string() },
            ]
        );
    }

    #[test]
    fn test_empty_registry_gives_empty_list() {
        let xml = render_nav(&ContentRegistry::new()).unwrap();
        let links = parse_nav_links(std::str::from_utf8(&xml).unwrap()).unwrap();
        assert!(links.is_empty());
    }
}
