//! 帖子仓库
//!
//! 内存中的帖子列表是唯一可信来源，每次变更后整体写回本地存储。
//!
//! 启动时处于 loading 状态：等待 `LocalStorage::load_delay` 之后才读取持久化记录。
//! loading 期间绝不写入存储；期间发生的变更先排队，加载完成后按顺序重放并写入一次。

use std::time::Instant;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::error::{Result, StoreError};
use crate::models::{Post, PostDraft};
use crate::storage::LocalStorage;

/// 持久化记录的键
pub const POSTS_KEY: &str = "posts";

/// loading 期间排队的变更
#[derive(Debug, Clone)]
enum PendingChange {
    Add(Post),
    Delete(i64),
    Update {
        id: i64,
        draft: PostDraft,
        now: DateTime<Utc>,
    },
}

pub struct PostStore {
    posts: Vec<Post>,
    loading: bool,
    ready_at: Instant,
    pending: Vec<PendingChange>,
    storage: LocalStorage,
}

impl PostStore {
    /// 创建仓库，进入 loading 状态
    pub fn new(storage: LocalStorage) -> Self {
        let ready_at = Instant::now() + storage.load_delay();
        Self {
            posts: Vec::new(),
            loading: true,
            ready_at,
            pending: Vec::new(),
            storage,
        }
    }

    /// 当前列表（最新的在前）
    pub fn list(&self) -> &[Post] {
        &self.posts
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn get(&self, id: i64) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// 由事件循环驱动；加载延迟到期时完成加载，返回本次是否完成了加载
    pub fn tick(&mut self, now: Instant) -> Result<bool> {
        if !self.loading || now < self.ready_at {
            return Ok(false);
        }
        self.complete_load()?;
        Ok(true)
    }

    /// 立即读取持久化记录并结束 loading
    pub fn complete_load(&mut self) -> Result<()> {
        if !self.loading {
            return Ok(());
        }

        self.posts = self.read_record();
        self.loading = false;
        info!(
            "event=posts_loaded module=store status=ok count={}",
            self.posts.len()
        );

        let pending = std::mem::take(&mut self.pending);
        if pending.is_empty() {
            return Ok(());
        }

        let replayed = pending.len();
        for change in pending {
            if let Err(e) = self.apply(change) {
                warn!("event=pending_change_dropped module=store status=error error={e}");
            }
        }
        debug!("event=pending_replayed module=store count={replayed}");
        self.persist()
    }

    /// 新帖子插到最前面
    pub fn add(&mut self, post: Post) -> Result<()> {
        post.validate()?;
        if self.loading {
            debug!("event=change_deferred module=store op=add id={}", post.id);
            self.pending.push(PendingChange::Add(post));
            return Ok(());
        }

        self.apply(PendingChange::Add(post))?;
        self.persist()
    }

    /// 删除所有匹配 id 的帖子，返回删除数量；不存在时什么也不做
    pub fn delete(&mut self, id: i64) -> Result<usize> {
        if self.loading {
            debug!("event=change_deferred module=store op=delete id={id}");
            self.pending.push(PendingChange::Delete(id));
            return Ok(0);
        }

        let before = self.posts.len();
        self.apply(PendingChange::Delete(id))?;
        let removed = before - self.posts.len();
        self.persist()?;
        Ok(removed)
    }

    /// 编辑：保留 id，创建时间重置为 `now`，并移到列表最前面
    pub fn update(&mut self, id: i64, draft: PostDraft, now: DateTime<Utc>) -> Result<()> {
        draft.validate()?;
        if self.loading {
            debug!("event=change_deferred module=store op=update id={id}");
            self.pending.push(PendingChange::Update { id, draft, now });
            return Ok(());
        }

        self.apply(PendingChange::Update { id, draft, now })?;
        self.persist()
    }

    /// 新帖子的 id：创建时间的毫秒数，必要时顺延以免与已有 id 冲突
    pub fn next_id(&self, now: DateTime<Utc>) -> i64 {
        let candidate = now.timestamp_millis();
        let pending_ids = self.pending.iter().filter_map(|c| match c {
            PendingChange::Add(post) => Some(post.id),
            _ => None,
        });
        match self.posts.iter().map(|p| p.id).chain(pending_ids).max() {
            Some(max) if max >= candidate => max + 1,
            _ => candidate,
        }
    }

    fn apply(&mut self, change: PendingChange) -> Result<()> {
        match change {
            PendingChange::Add(post) => {
                if self.get(post.id).is_some() {
                    return Err(StoreError::DuplicateId(post.id));
                }
                self.posts.insert(0, post);
            }
            PendingChange::Delete(id) => {
                self.posts.retain(|p| p.id != id);
            }
            PendingChange::Update { id, draft, now } => {
                let index = self
                    .posts
                    .iter()
                    .position(|p| p.id == id)
                    .ok_or(StoreError::NotFound(id))?;
                self.posts.remove(index);
                self.posts.retain(|p| p.id != id);
                self.posts.insert(0, Post::from_draft(id, draft, now));
            }
        }
        Ok(())
    }

    /// 读取持久化记录；缺失、读不出或解析失败都视为空列表
    fn read_record(&self) -> Vec<Post> {
        match self.storage.get_item(POSTS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Post>>(&raw) {
                Ok(posts) => posts,
                Err(e) => {
                    warn!("event=record_unparsable module=store status=error key={POSTS_KEY} error={e}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("event=record_unreadable module=store status=error key={POSTS_KEY} error={e}");
                Vec::new()
            }
        }
    }

    fn persist(&self) -> Result<()> {
        debug_assert!(!self.loading);
        let raw = serde_json::to_string(&self.posts)?;
        self.storage.set_item(POSTS_KEY, &raw)?;
        debug!(
            "event=posts_saved module=store status=ok count={}",
            self.posts.len()
        );
        Ok(())
    }
}
