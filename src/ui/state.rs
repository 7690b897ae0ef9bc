//! App 状态定义 (Model)
//!
//! 包含应用状态结构体、路由及表单状态

use std::fmt;

use crate::models::{Post, PostDraft};
use crate::store::PostStore;

/// 应用状态
pub struct App {
    pub store: PostStore,
    pub route: Route,
    pub selected_index: usize,
    pub mode: AppMode,
    pub form: PostForm,
    pub message: Option<String>,
}

/// 路由（三个页面）
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    List,        // /
    Detail(i64), // /post/{id}
    Edit(i64),   // /post/edit/{id}
}

impl Route {
    /// 解析路径，无法识别时返回 None
    pub fn parse(path: &str) -> Option<Self> {
        let segments: Vec<&str> = path
            .trim()
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Some(Route::List),
            ["post", id] => id.parse().ok().map(Route::Detail),
            ["post", "edit", id] => id.parse().ok().map(Route::Edit),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::List => write!(f, "/"),
            Route::Detail(id) => write!(f, "/post/{id}"),
            Route::Edit(id) => write!(f, "/post/edit/{id}"),
        }
    }
}

/// 应用模式
#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Normal,
    FillingForm,
    Confirm(ConfirmAction),
}

/// 确认操作类型
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmAction {
    Delete(i64),
}

/// 表单字段（按显示顺序）
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormField {
    Title,
    Content,
    Description,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Title => FormField::Content,
            FormField::Content => FormField::Description,
            FormField::Description => FormField::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormField::Title => FormField::Description,
            FormField::Content => FormField::Title,
            FormField::Description => FormField::Content,
        }
    }
}

/// 新建/编辑共用的表单
#[derive(Debug, Clone, PartialEq)]
pub struct PostForm {
    pub draft: PostDraft,
    pub focused: FormField,
}

impl Default for PostForm {
    fn default() -> Self {
        Self {
            draft: PostDraft::default(),
            focused: FormField::Title,
        }
    }
}

impl PostForm {
    pub fn from_post(post: &Post) -> Self {
        Self {
            draft: post.to_draft(),
            focused: FormField::Title,
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.draft.title,
            FormField::Content => &self.draft.content,
            FormField::Description => &self.draft.description,
        }
    }

    /// 当前聚焦的输入缓冲区
    pub fn focused_mut(&mut self) -> &mut String {
        match self.focused {
            FormField::Title => &mut self.draft.title,
            FormField::Content => &mut self.draft.content,
            FormField::Description => &mut self.draft.description,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl App {
    /// 创建新的应用实例
    pub fn new(store: PostStore, route: Route) -> Self {
        Self {
            store,
            route,
            selected_index: 0,
            mode: AppMode::Normal,
            form: PostForm::default(),
            message: None,
        }
    }

    /// 列表页当前选中的帖子
    pub fn selected_post(&self) -> Option<&Post> {
        self.store.list().get(self.selected_index)
    }

    /// 详情页/编辑页对应的帖子
    pub fn routed_post(&self) -> Option<&Post> {
        match self.route {
            Route::Detail(id) | Route::Edit(id) => self.store.get(id),
            Route::List => None,
        }
    }

    /// 确保选中索引有效
    pub fn refresh_selection(&mut self) {
        let len = self.store.list().len();
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
    }
}
