use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// 默认的启动加载延迟
pub const DEFAULT_LOAD_DELAY: Duration = Duration::from_millis(300);

/// 本地持久化存储，一个键对应目录下的一个 JSON 文件
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
    load_delay: Duration,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            load_delay: DEFAULT_LOAD_DELAY,
        }
    }

    /// 设置启动加载延迟（测试中通常为零）
    pub fn with_load_delay(mut self, load_delay: Duration) -> Self {
        self.load_delay = load_delay;
        self
    }

    pub fn load_delay(&self) -> Duration {
        self.load_delay
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    /// 读取记录，不存在时返回 None
    pub fn get_item(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// 整体覆盖写入记录（先写临时文件再改名）
    pub fn set_item(&self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;

        let path = self.path_for(key);
        let tmp = self.root.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        assert_eq!(storage.get_item("posts").unwrap(), None);
    }

    #[test]
    fn test_set_item_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested");
        let storage = LocalStorage::new(&root);

        storage.set_item("posts", "[1]").unwrap();
        storage.set_item("posts", "[2]").unwrap();

        assert_eq!(storage.get_item("posts").unwrap().as_deref(), Some("[2]"));
        assert!(!root.join(".posts.json.tmp").exists());
    }

    #[test]
    fn test_default_delay() {
        let storage = LocalStorage::new("unused");
        assert_eq!(storage.load_delay(), Duration::from_millis(300));
        let storage = storage.with_load_delay(Duration::ZERO);
        assert_eq!(storage.load_delay(), Duration::ZERO);
    }
}
