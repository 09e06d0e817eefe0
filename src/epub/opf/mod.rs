//! OPF（Open Packaging Format）模块
//!
//! 生成和解析EPUB包文件，包括元数据、清单、脊柱。

mod manifest;
mod metadata;
mod parser;
mod spine;
mod writer;

pub use manifest::ManifestItem;
pub use metadata::{BookMetadata, DEFAULT_LANGUAGE, UNKNOWN_CREATOR};
pub use parser::Opf;
pub use spine::SpineItem;
pub use writer::{UNIQUE_IDENTIFIER_ID, manifest_items, render_package};
