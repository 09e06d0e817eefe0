use crate::epub::error::{EpubError, Result};
use crate::epub::xml::{XmlDocument, ns};
use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// container.xml在归档中的路径
pub const CONTAINER_PATH: &str = "META-INF/container.xml";

/// OPF文件在归档中的路径
pub const OPF_PATH: &str = "OEBPS/content.opf";

/// OPF文件的媒体类型
pub const OPF_MEDIA_TYPE: &str = "application/oebps-package+xml";

/// Container.xml中的rootfile信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootFile {
    pub full_path: String,
    pub media_type: String,
}

/// Container.xml的内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub rootfiles: Vec<RootFile>,
}

impl Container {
    /// 指向给定OPF路径的container
    pub fn for_package(opf_path: &str) -> Self {
        Self {
            rootfiles: vec![RootFile {
                full_path: opf_path.to_string(),
                media_type: OPF_MEDIA_TYPE.to_string(),
            }],
        }
    }

    /// 生成container.xml内容
    pub fn render(&self) -> Result<Vec<u8>> {
        let mut doc = XmlDocument::new()?;
        doc.start("container", &[("version", "1.0"), ("xmlns", ns::CONTAINER)])?;
        doc.start("rootfiles", &[])?;
        for rootfile in &self.rootfiles {
            doc.empty(
                "rootfile",
                &[
                    ("full-path", rootfile.full_path.as_str()),
                    ("media-type", rootfile.media_type.as_str()),
                ],
            )?;
        }
        doc.end("rootfiles")?;
        doc.end("container")?;
        Ok(doc.finish())
    }

    /// 解析container.xml内容
    ///
    /// # 参数
    /// * `xml_content` - container.xml的文件内容
    ///
    /// # 返回值
    /// * `Result<Container, EpubError>` - 解析后的Container信息
    pub fn parse_xml(xml_content: &str) -> Result<Container> {
        let mut reader = Reader::from_str(xml_content);
        reader.config_mut().trim_text(true);
        reader.config_mut().expand_empty_elements = true;

        let mut rootfiles = Vec::new();
        let mut buf = Vec::new();
        let mut in_rootfiles = false;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) | Event::Empty(ref e) => match e.local_name().as_ref() {
                    b"rootfiles" => {
                        in_rootfiles = true;
                    }
                    b"rootfile" if in_rootfiles => {
                        let mut full_path = String::new();
                        let mut media_type = String::new();

                        for attr_result in e.attributes() {
                            let attr = attr_result
                                .map_err(|e| EpubError::XmlError(quick_xml::Error::InvalidAttr(e)))?;
                            match attr.key.local_name().as_ref() {
                                b"full-path" => {
                                    full_path = String::from_utf8_lossy(&attr.value).to_string();
                                }
                                b"media-type" => {
                                    media_type = String::from_utf8_lossy(&attr.value).to_string();
                                }
                                _ => {}
                            }
                        }

                        if !full_path.is_empty() && !media_type.is_empty() {
                            rootfiles.push(RootFile { full_path, media_type });
                        }
                    }
                    _ => {}
                },
                Event::End(ref e) => {
                    if e.local_name().as_ref() == b"rootfiles" {
                        in_rootfiles = false;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if rootfiles.is_empty() {
            return Err(EpubError::ContainerParseError(
                "没有找到任何rootfile条目".to_string(),
            ));
        }

        Ok(Container { rootfiles })
    }

    /// 获取主要的OPF文件路径
    pub fn get_opf_path(&self) -> Option<String> {
        self.rootfiles
            .iter()
            .find(|rootfile| rootfile.media_type == OPF_MEDIA_TYPE)
            .or_else(|| self.rootfiles.first())
            .map(|rootfile| rootfile.full_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_points_at_package_document() {
        let xml = Container::for_package(OPF_PATH).render().unwrap();
        let xml = String::from_utf8(xml).unwrap();
        assert!(xml.contains(r#"xmlns="urn:oasis:names:tc:opendocument:xmlns:container""#));
        assert!(xml.contains(
            r#"<rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>"#
        ));
    }

    #[test]
    fn test_render_then_parse() {
        let xml = Container::for_package(OPF_PATH).render().unwrap();
        let container = Container::parse_xml(std::str::from_utf8(&xml).unwrap()).unwrap();
        assert_eq!(container, Container::for_package(OPF_PATH));
        assert_eq!(container.get_opf_path(), Some(OPF_PATH.to_string()));
    }

    #[test]
    fn test_parse_container_xml_with_single_rootfile() {
        let container_xml = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
    <rootfiles>
        <rootfile full-path="content.opf" media-type="application/oebps-package+xml"/>
    </rootfiles>
</container>"#;

        let container = Container::parse_xml(container_xml).unwrap();
        assert_eq!(container.rootfiles.len(), 1);
        assert_eq!(container.get_opf_path(), Some("content.opf".to_string()));
    }

    #[test]
    fn test_parse_without_rootfile_fails() {
        let container_xml = r#"<container version="1.0"><rootfiles></rootfiles></container>"#;
        assert!(matches!(
            Container::parse_xml(container_xml),
            Err(EpubError::ContainerParseError(_))
        ));
    }
}
