//! 会话标识模块
//!
//! 每个构建会话只生成一次的随机标识：包UUID、导航UUID、XML id前缀字母以及构建时间。

use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use uuid::Uuid;

/// 单个构建会话的标识信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// 书籍唯一标识符
    pub package_uuid: Uuid,
    /// NCX导航点标识符
    pub nav_uuid: Uuid,
    /// XML id前缀（XML id不能以数字开头）
    pub id_prefix: char,
    /// 构建时间
    pub built_at: DateTime<Utc>,
}

impl Identity {
    /// 生成新的会话标识
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            package_uuid: Uuid::new_v4(),
            nav_uuid: Uuid::new_v4(),
            id_prefix: rng.gen_range(b'a'..=b'z') as char,
            built_at: Utc::now(),
        }
    }

    /// OPF与NCX共用的唯一标识符文本
    pub fn package_identifier(&self) -> String {
        format!("urn:uuid:{}", self.package_uuid)
    }

    /// NCX导航点的id
    pub fn nav_point_id(&self) -> String {
        format!("{}{}", self.id_prefix, self.nav_uuid)
    }

    /// dcterms:modified 使用的时间格式
    pub fn modified(&self) -> String {
        self.built_at.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    /// calibre:timestamp 使用的时间格式
    pub fn calibre_timestamp(&self) -> String {
        self.built_at
            .to_rfc3339_opts(SecondsFormat::Micros, false)
    }
}
