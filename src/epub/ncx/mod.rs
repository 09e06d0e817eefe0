//! NCX（Navigation Control file for XML）模块
//!
//! 生成和解析EPUB中的NCX导航控制文件。

pub mod navigation;
pub mod parser;
pub mod writer;

pub use navigation::{DocTitle, NavContent, NavLabel, NavMap, NavPoint, NcxMetadata};
pub use parser::Ncx;
pub use writer::render_ncx;
