use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::storage::DEFAULT_LOAD_DELAY;

const APP_DIR: &str = "miniblog";

/// 配置文件结构 (config.toml)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 数据目录，为空时使用 ~/.local/share/miniblog/
    pub data_dir: Option<PathBuf>,
    /// 启动加载延迟（毫秒）
    pub load_delay_ms: u64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            load_delay_ms: DEFAULT_LOAD_DELAY.as_millis() as u64,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// 从指定路径加载，文件不存在时返回默认配置
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config `{}`", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("invalid config `{}`", path.display()))?;
        Ok(config)
    }

    /// 默认配置文件路径 (~/.config/miniblog/config.toml)
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().context("could not determine config directory")?;
        Ok(dir.join(APP_DIR).join("config.toml"))
    }

    /// 数据目录：配置优先，否则使用系统数据目录
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let dir = dirs::data_dir().context("could not determine data directory")?;
        Ok(dir.join(APP_DIR))
    }

    pub fn load_delay(&self) -> Duration {
        Duration::from_millis(self.load_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.load_delay(), Duration::from_millis(300));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "load_delay_ms = 0\ndata_dir = \"/tmp/posts\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.load_delay(), Duration::ZERO);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.resolve_data_dir().unwrap(), PathBuf::from("/tmp/posts"));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "load_delay_ms = \"soon\"").unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
