pub mod builder;
pub mod container;
pub mod error;
pub mod identity;
pub mod nav;
pub mod ncx;
pub mod opf;
pub mod package;
pub mod page;
pub mod reader;
pub mod registry;
pub mod xml;

// 重新导出错误处理
pub use error::{EpubError, Result};

// 重新导出构建会话
pub use builder::EpubBuilder;
pub use identity::Identity;
pub use registry::{ContentEntry, ContentKind, ContentRegistry};

// 重新导出容器相关
pub use container::{Container, RootFile};

// 重新导出EPUB读取器
pub use reader::{BookInfo, Epub};

// 重新导出OPF相关
pub use opf::{BookMetadata, ManifestItem, Opf, SpineItem};

// 重新导出NCX与导航文档相关
pub use nav::NavLink;
pub use ncx::{DocTitle, NavMap, NavPoint, Ncx};
