//! XML文档构建工具
//!
//! 在quick-xml事件写入器之上的薄封装，所有生成的XML文档都通过它构建，
//! 文本和属性值由quick-xml负责转义。

use crate::epub::error::Result;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Cursor;

/// 常用命名空间
pub mod ns {
    pub const CONTAINER: &str = "urn:oasis:names:tc:opendocument:xmlns:container";
    pub const OPF: &str = "http://www.idpf.org/2007/opf";
    pub const NCX: &str = "http://www.daisy.org/z3986/2005/ncx/";
    pub const XHTML: &str = "http://www.w3.org/1999/xhtml";
    pub const OPS: &str = "http://www.idpf.org/2007/ops";
    pub const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
    pub const DCTERMS: &str = "http://purl.org/dc/terms/";
    pub const DC: &str = "http://purl.org/dc/elements/1.1/";
    pub const CALIBRE: &str = "http://calibre.kovidgoyal.net/2009/metadata";
}

/// 带缩进的XML文档写入器
pub struct XmlDocument {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlDocument {
    /// 创建文档并写入XML声明
    pub fn new() -> Result<Self> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        Ok(Self { writer })
    }

    /// 写入`<!DOCTYPE ...>`
    pub fn doctype(&mut self, content: &str) -> Result<&mut Self> {
        self.writer
            .write_event(Event::DocType(BytesText::from_escaped(content)))?;
        Ok(self)
    }

    /// 写入开始标签
    pub fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<&mut Self> {
        self.writer.write_event(Event::Start(element(name, attrs)))?;
        Ok(self)
    }

    /// 写入结束标签
    pub fn end(&mut self, name: &str) -> Result<&mut Self> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(self)
    }

    /// 写入空元素
    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<&mut Self> {
        self.writer.write_event(Event::Empty(element(name, attrs)))?;
        Ok(self)
    }

    /// 写入只包含文本的元素
    pub fn text_element(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<&mut Self> {
        self.writer.write_event(Event::Start(element(name, attrs)))?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(self)
    }

    /// 结束文档，返回UTF-8字节
    pub fn finish(self) -> Vec<u8> {
        let mut bytes = self.writer.into_inner().into_inner();
        bytes.push(b'\n');
        bytes
    }
}

fn element<'a>(name: &'a str, attrs: &[(&'a str, &'a str)]) -> BytesStart<'a> {
    let mut start = BytesStart::new(name);
    for &attr in attrs {
        start.push_attribute(attr);
    }
    start
}
