//! OPF生成模块
//!
//! 根据元数据、会话标识和内容登记表生成content.opf。

use crate::epub::error::Result;
use crate::epub::identity::Identity;
use crate::epub::opf::manifest::ManifestItem;
use crate::epub::opf::metadata::BookMetadata;
use crate::epub::registry::{ContentKind, ContentRegistry};
use crate::epub::xml::{XmlDocument, ns};

/// dc:identifier 的id，同时是package的unique-identifier
pub const UNIQUE_IDENTIFIER_ID: &str = "uuid_id";

/// 生成OPF包文件
///
/// manifest依次包含导航文档、样式表、按登记顺序排列的内容页与图片、NCX；
/// spine只包含内容页。
pub fn render_package(
    metadata: &BookMetadata,
    identity: &Identity,
    registry: &ContentRegistry,
) -> Result<Vec<u8>> {
    let mut doc = XmlDocument::new()?;
    doc.start(
        "package",
        &[
            ("xmlns", ns::OPF),
            ("unique-identifier", UNIQUE_IDENTIFIER_ID),
            ("version", "3.0"),
        ],
    )?;

    write_metadata(&mut doc, metadata, identity)?;

    doc.start("manifest", &[])?;
    for item in manifest_items(registry) {
        let mut attrs = vec![
            ("id", item.id.as_str()),
            ("href", item.href.as_str()),
            ("media-type", item.media_type.as_str()),
        ];
        if let Some(properties) = item.properties.as_deref() {
            attrs.push(("properties", properties));
        }
        doc.empty("item", &attrs)?;
    }
    doc.end("manifest")?;

    doc.start("spine", &[("toc", "ncx")])?;
    for page in registry.entries_of_kind(ContentKind::Html) {
        doc.empty("itemref", &[("idref", page.symbolic_id.as_str())])?;
    }
    doc.end("spine")?;

    doc.end("package")?;
    Ok(doc.finish())
}

fn write_metadata(doc: &mut XmlDocument, metadata: &BookMetadata, identity: &Identity) -> Result<()> {
    doc.start(
        "metadata",
        &[
            ("xmlns:xsi", ns::XSI),
            ("xmlns:dcterms", ns::DCTERMS),
            ("xmlns:calibre", ns::CALIBRE),
            ("xmlns:dc", ns::DC),
        ],
    )?;
    doc.text_element("dc:language", &[], &metadata.language)?;
    doc.text_element("dc:creator", &[], metadata.creator())?;
    doc.empty(
        "meta",
        &[
            ("name", "calibre:timestamp"),
            ("content", identity.calibre_timestamp().as_str()),
        ],
    )?;
    doc.empty(
        "meta",
        &[("name", "calibre:title_sort"), ("content", metadata.title_sort())],
    )?;
    doc.text_element("meta", &[("property", "dcterms:modified")], &identity.modified())?;
    doc.text_element("dc:title", &[], &metadata.title)?;

    if let Some(series) = metadata.series.as_deref() {
        doc.empty("meta", &[("name", "calibre:series"), ("content", series)])?;
        if let Some(index) = metadata.series_index.as_deref() {
            doc.empty("meta", &[("name", "calibre:series_index"), ("content", index)])?;
        }
    }

    doc.text_element(
        "dc:identifier",
        &[("id", UNIQUE_IDENTIFIER_ID)],
        &identity.package_identifier(),
    )?;
    doc.end("metadata")?;
    Ok(())
}

/// manifest条目，顺序与生成的OPF一致
pub fn manifest_items(registry: &ContentRegistry) -> Vec<ManifestItem> {
    let mut items = vec![ManifestItem::nav()];
    items.extend(registry.entries_of_kind(ContentKind::Css).map(ManifestItem::from));
    items.extend(
        registry
            .iter()
            .filter(|entry| matches!(entry.kind, ContentKind::Html | ContentKind::Image))
            .map(ManifestItem::from),
    );
    items.extend(registry.entries_of_kind(ContentKind::Ncx).map(ManifestItem::from));
    items
}
