//! 内容页与样式表
//!
//! 每张图片对应一个只包含一个`<img>`的XHTML页面，所有页面共用同一个静态样式表。

use crate::epub::error::{EpubError, Result};
use crate::epub::registry::ContentEntry;
use crate::epub::xml::{XmlDocument, ns};
use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// 样式表相对于OPF的路径
pub const STYLESHEET_HREF: &str = "CSS/stylesheet.css";

/// 静态样式表内容
pub const STYLESHEET: &str = "\
.album {
    height: 100%;
    text-align: center;
    vertical-align: top;
    display: block;
    margin: 0;
}
.albumimg {
    margin: 0;
    height: 100%;
    text-align: center;
    vertical-align: top;
}
";

/// 生成单张图片的内容页
///
/// # 参数
/// * `title` - 页面标题，同时作为图片的alt文本
/// * `language` - 页面语言
/// * `image` - 页面引用的图片条目
pub fn render_page(title: &str, language: &str, image: &ContentEntry) -> Result<Vec<u8>> {
    let src = image.href();

    let mut doc = XmlDocument::new()?;
    doc.start(
        "html",
        &[("xmlns", ns::XHTML), ("lang", language), ("xml:lang", language)],
    )?;

    doc.start("head", &[])?;
    doc.text_element("title", &[], title)?;
    doc.empty(
        "meta",
        &[("http-equiv", "Content-Type"), ("content", "text/html; charset=utf-8")],
    )?;
    doc.empty(
        "link",
        &[("href", STYLESHEET_HREF), ("rel", "stylesheet"), ("type", "text/css")],
    )?;
    doc.end("head")?;

    doc.start("body", &[("class", "album")])?;
    doc.start("div", &[])?;
    doc.empty(
        "img",
        &[("src", src.as_str()), ("class", "albumimg"), ("alt", title)],
    )?;
    doc.end("div")?;
    doc.end("body")?;

    doc.end("html")?;
    Ok(doc.finish())
}

/// 读取内容页中第一张图片的src
pub fn parse_image_src(xml_content: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_str(xml_content);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e) if e.local_name().as_ref() == b"img" => {
                for attr_result in e.attributes() {
                    let attr = attr_result
                        .map_err(|err| EpubError::XmlError(quick_xml::Error::InvalidAttr(err)))?;
                    if attr.key.as_ref() == b"src" {
                        return Ok(Some(attr.unescape_value()?.to_string()));
                    }
                }
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
        buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_references_its_image() {
        let xml = render_page("Test Book", "zh-CN", &ContentEntry::image(7)).unwrap();
        let xml = String::from_utf8(xml).unwrap();
        assert!(xml.contains("<title>Test Book</title>"));
        assert!(xml.contains(r#"<body class="album">"#));
        assert!(xml.contains(r#"href="CSS/stylesheet.css""#));
        assert_eq!(parse_image_src(&xml).unwrap().as_deref(), Some("Image/7.jpg"));
    }

    #[test]
    fn test_title_with_markup_is_escaped() {
        let xml = render_page("<b>", "en", &ContentEntry::image(0)).unwrap();
        let xml = String::from_utf8(xml).unwrap();
        assert!(xml.contains("<title>&lt;b&gt;</title>"));
        assert!(xml.contains(r#"alt="&lt;b&gt;""#));
    }

    #[test]
    fn test_page_without_image() {
        assert_eq!(parse_image_src("<html><body/></html>").unwrap(), None);
    }
}
