use thiserror::Error;

/// 存储层错误
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),

    #[error("Post {0} already exists")]
    DuplicateId(i64),

    #[error("Post {0} not found")]
    NotFound(i64),
}

impl StoreError {
    /// 写入存储失败（内存中的变更已生效）
    pub fn is_persist(&self) -> bool {
        matches!(self, StoreError::Io(_) | StoreError::Json(_))
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
