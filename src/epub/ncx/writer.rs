//! NCX生成模块

use crate::epub::error::Result;
use crate::epub::identity::Identity;
use crate::epub::opf::BookMetadata;
use crate::epub::registry::{ContentKind, ContentRegistry};
use crate::epub::xml::{XmlDocument, ns};

/// dtb:generator 的值
pub const GENERATOR: &str = concat!("comicforge (", env!("CARGO_PKG_VERSION"), ")");

/// NCX固定的导航深度
pub const NCX_DEPTH: &str = "2";

/// 生成toc.ncx
///
/// 只有一个名为"Start"的导航点，指向第一个内容页。
pub fn render_ncx(
    metadata: &BookMetadata,
    identity: &Identity,
    registry: &ContentRegistry,
) -> Result<Vec<u8>> {
    let uid = identity.package_identifier();
    let nav_point_id = identity.nav_point_id();
    let start = registry
        .first_of_kind(ContentKind::Html)
        .map(|page| page.href())
        .unwrap_or_default();

    let mut doc = XmlDocument::new()?;
    doc.start(
        "ncx",
        &[
            ("xmlns", ns::NCX),
            ("version", "2005-1"),
            ("xml:lang", metadata.language.as_str()),
        ],
    )?;

    doc.start("head", &[])?;
    doc.empty("meta", &[("content", uid.as_str()), ("name", "dtb:uid")])?;
    doc.empty("meta", &[("content", NCX_DEPTH), ("name", "dtb:depth")])?;
    doc.empty("meta", &[("content", GENERATOR), ("name", "dtb:generator")])?;
    doc.empty("meta", &[("content", "0"), ("name", "dtb:totalPageCount")])?;
    doc.empty("meta", &[("content", "0"), ("name", "dtb:maxPageNumber")])?;
    doc.end("head")?;

    doc.start("docTitle", &[])?;
    doc.text_element("text", &[], &metadata.title)?;
    doc.end("docTitle")?;

    doc.start("navMap", &[])?;
    doc.start("navPoint", &[("id", nav_point_id.as_str()), ("playOrder", "1")])?;
    doc.start("navLabel", &[])?;
    doc.text_element("text", &[], "Start")?;
    doc.end("navLabel")?;
    doc.empty("content", &[("src", start.as_str())])?;
    doc.end("navPoint")?;
    doc.end("navMap")?;

    doc.end("ncx")?;
    Ok(doc.finish())
}
