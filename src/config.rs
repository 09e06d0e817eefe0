//! 配置模块
//!
//! 从YAML文件加载构建时的默认值：语言、默认作者、输出目录、压缩级别等。

use crate::epub::error::{EpubError, Result};
use crate::epub::opf::{DEFAULT_LANGUAGE, UNKNOWN_CREATOR};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "comicforge.yaml";

/// 构建配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 书籍语言
    pub language: String,
    /// 未指定作者时使用的名字
    pub default_creator: String,
    /// 未指定输出路径时EPUB文件所在的目录
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    /// deflate压缩级别(0-9)，为空时使用zip的默认级别
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression_level: Option<i64>,
    /// 输出调试日志
    pub debug_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    /// 获取默认配置
    pub fn default_config() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            default_creator: UNKNOWN_CREATOR.to_string(),
            output_dir: None,
            compression_level: None,
            debug_mode: false,
        }
    }

    /// 从指定的配置文件中加载配置
    ///
    /// # 参数
    /// * `path` - YAML配置文件路径
    ///
    /// # 返回值
    /// * `Result<Self>` - 加载成功返回配置实例，失败返回`ConfigError`
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| EpubError::ConfigError(format!("无法读取配置文件: {}", e)))?;

        let config: Self = serde_yml::from_str(&content)
            .map_err(|e| EpubError::ConfigError(format!("配置文件格式错误: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// 检查配置取值
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = self.compression_level {
            if !(0..=9).contains(&level) {
                return Err(EpubError::ConfigError(format!(
                    "compression_level必须在0到9之间, 实际为{}",
                    level
                )));
            }
        }
        if self.language.trim().is_empty() {
            return Err(EpubError::ConfigError("language不能为空".to_string()));
        }
        Ok(())
    }

    /// 将默认配置写入指定路径
    ///
    /// # 参数
    /// * `path` - 生成的配置文件路径
    pub fn generate_default_config(path: impl AsRef<Path>) -> Result<()> {
        let yaml_content = serde_yml::to_string(&Self::default_config())
            .map_err(|e| EpubError::ConfigError(format!("序列化配置失败: {}", e)))?;

        let content_with_header = format!(
            "# comicforge配置文件\n# 构建EPUB时使用的默认值，命令行参数优先\n\n{}",
            yaml_content
        );

        fs::write(path.as_ref(), content_with_header)
            .map_err(|e| EpubError::ConfigError(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }

    /// 加载配置
    ///
    /// 指定了路径时必须能成功读取；否则尝试当前目录下的`comicforge.yaml`，
    /// 文件不存在时使用默认配置。
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    tracing::debug!("未找到{}，使用默认配置", DEFAULT_CONFIG_PATH);
                    Ok(Self::default_config())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_file_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comicforge.yaml");
        Config::generate_default_config(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# comicforge配置文件"));
        assert_eq!(Config::from_file(&path).unwrap(), Config::default_config());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.yaml");
        fs::write(&path, "language: ja\ncompression_level: 9\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.language, "ja");
        assert_eq!(config.compression_level, Some(9));
        assert_eq!(config.default_creator, "Unknown");
        assert!(!config.debug_mode);
    }

    #[test]
    fn test_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");

        fs::write(&path, "compression_level: 42\n").unwrap();
        assert!(matches!(Config::from_file(&path), Err(EpubError::ConfigError(_))));

        fs::write(&path, "language: [").unwrap();
        assert!(matches!(Config::from_file(&path), Err(EpubError::ConfigError(_))));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("none.yaml");
        assert!(matches!(
            Config::load_or_default(Some(&missing)),
            Err(EpubError::ConfigError(_))
        ));
    }
}
