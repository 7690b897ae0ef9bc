//! 业务逻辑处理 (Update/Dispatch)
//!
//! 包含核心的 dispatch 逻辑和各种业务处理方法

use std::time::Instant;

use chrono::Utc;
use log::error;

use super::actions::Action;
use super::state::{App, AppMode, ConfirmAction, PostForm, Route};
use crate::error::StoreError;
use crate::models::{Post, REQUIRED_FIELDS_MESSAGE};

impl App {
    /// 核心逻辑分发，返回是否退出
    pub fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::MoveSelectionUp => self.move_up(),
            Action::MoveSelectionDown => self.move_down(),

            Action::OpenSelected => self.open_selected(),
            Action::Back => self.back(),

            Action::StartCreate => self.start_create(),
            Action::StartEdit => self.start_edit(),
            Action::StartDelete => self.start_delete(),

            Action::NextField => self.form.focused = self.form.focused.next(),
            Action::PrevField => self.form.focused = self.form.focused.prev(),
            Action::Cancel => self.cancel(),

            Action::Submit => match (&self.mode, &self.route) {
                (AppMode::FillingForm, Route::List) => self.confirm_create(),
                (AppMode::FillingForm, Route::Edit(id)) => {
                    let id = *id;
                    self.confirm_edit(id);
                }
                (AppMode::Confirm(_), _) => self.execute_confirm(),
                _ => {}
            },

            Action::Input(c) => {
                if self.mode == AppMode::FillingForm {
                    self.form.focused_mut().push(c);
                }
            }

            Action::DeleteChar => {
                if self.mode == AppMode::FillingForm {
                    self.form.focused_mut().pop();
                }
            }
        }
        false
    }

    /// 每次事件循环调用，推进仓库的加载
    pub fn tick(&mut self, now: Instant) {
        let loaded = match self.store.tick(now) {
            Ok(loaded) => loaded,
            Err(e) => {
                self.report_save_error(&e);
                true
            }
        };
        // 加载完成后重新进入当前页面（编辑页需要预填表单）
        if loaded {
            let route = self.route.clone();
            self.navigate(route);
        }
    }

    // ============ 导航相关 ============

    /// 跳转到指定页面
    pub fn navigate(&mut self, route: Route) {
        self.mode = AppMode::Normal;
        self.form.clear();

        if let Route::Edit(id) = route {
            if let Some(post) = self.store.get(id) {
                self.form = PostForm::from_post(post);
                self.mode = AppMode::FillingForm;
            }
        }
        if let Route::Detail(id) = route {
            if let Some(index) = self.store.list().iter().position(|p| p.id == id) {
                self.selected_index = index;
            }
        }

        self.route = route;
        self.refresh_selection();
    }

    /// 向上移动选择
    pub fn move_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// 向下移动选择
    pub fn move_down(&mut self) {
        if self.selected_index + 1 < self.store.list().len() {
            self.selected_index += 1;
        }
    }

    pub fn open_selected(&mut self) {
        if let Some(id) = self.selected_post().map(|p| p.id) {
            self.message = None;
            self.navigate(Route::Detail(id));
        }
    }

    /// 返回上一级：详情 -> 列表，编辑 -> 详情
    pub fn back(&mut self) {
        self.message = None;
        match self.route {
            Route::Detail(_) => self.navigate(Route::List),
            Route::Edit(id) => self.navigate(Route::Detail(id)),
            Route::List => {}
        }
    }

    // ============ 新建相关 ============

    /// 聚焦新建表单
    pub fn start_create(&mut self) {
        if self.route == Route::List {
            self.form.clear();
            self.mode = AppMode::FillingForm;
            self.message = None;
        }
    }

    /// 确认新建
    pub fn confirm_create(&mut self) {
        if let Err(e) = self.form.draft.validate() {
            self.message = Some(e.to_string());
            return;
        }

        let now = Utc::now();
        let id = self.store.next_id(now);
        let post = Post::from_draft(id, self.form.draft.clone(), now);

        match self.store.add(post) {
            Ok(()) => self.message = Some("Post published.".to_string()),
            Err(e) if e.is_persist() => self.report_save_error(&e),
            Err(e) => {
                self.message = Some(e.to_string());
                return;
            }
        }
        self.form.clear();
        self.mode = AppMode::Normal;
        self.selected_index = 0;
    }

    // ============ 编辑相关 ============

    /// 进入编辑页
    pub fn start_edit(&mut self) {
        let id = match self.route {
            Route::List => self.selected_post().map(|p| p.id),
            Route::Detail(id) => Some(id),
            Route::Edit(_) => None,
        };
        if let Some(id) = id {
            self.message = None;
            self.navigate(Route::Edit(id));
        }
    }

    /// 确认编辑：移到列表最前面并重置创建时间，然后回到详情页
    pub fn confirm_edit(&mut self, id: i64) {
        if self.form.draft.validate().is_err() {
            self.message = Some(REQUIRED_FIELDS_MESSAGE.to_string());
            return;
        }

        match self.store.update(id, self.form.draft.clone(), Utc::now()) {
            Ok(()) => self.message = Some("Post updated.".to_string()),
            Err(e) if e.is_persist() => self.report_save_error(&e),
            Err(e) => {
                self.message = Some(e.to_string());
                return;
            }
        }
        self.navigate(Route::Detail(id));
    }

    // ============ 删除相关 ============

    /// 弹出删除确认
    pub fn start_delete(&mut self) {
        let id = match self.route {
            Route::List => self.selected_post().map(|p| p.id),
            Route::Detail(_) => self.routed_post().map(|p| p.id),
            Route::Edit(_) => None,
        };
        if let Some(id) = id {
            self.mode = AppMode::Confirm(ConfirmAction::Delete(id));
        }
    }

    /// 执行确认操作
    pub fn execute_confirm(&mut self) {
        if let AppMode::Confirm(ConfirmAction::Delete(id)) = self.mode {
            match self.store.delete(id) {
                Ok(_) => self.message = Some("Post deleted.".to_string()),
                Err(e) => self.report_save_error(&e),
            }
            if matches!(self.route, Route::Detail(_)) {
                self.navigate(Route::List);
            }
        }
        self.refresh_selection();
        self.mode = AppMode::Normal;
    }

    // ============ 通用操作 ============

    /// 取消当前操作
    pub fn cancel(&mut self) {
        self.message = None;
        match (&self.mode, &self.route) {
            (AppMode::FillingForm, Route::Edit(id)) => {
                let id = *id;
                self.navigate(Route::Detail(id));
            }
            (AppMode::FillingForm, _) => {
                self.form.clear();
                self.mode = AppMode::Normal;
            }
            _ => self.mode = AppMode::Normal,
        }
    }

    fn report_save_error(&mut self, e: &StoreError) {
        error!("event=posts_save_failed module=ui status=error route={} error={e}", self.route);
        self.message = Some(format!("Could not save posts: {e}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PostDraft;
    use crate::storage::LocalStorage;
    use crate::store::PostStore;
    use std::time::Duration;
    use tempfile::TempDir;

    fn app_in(dir: &TempDir, route: Route) -> App {
        let storage = LocalStorage::new(dir.path()).with_load_delay(Duration::ZERO);
        let mut app = App::new(PostStore::new(storage), route);
        app.tick(Instant::now());
        app
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.dispatch(Action::Input(c));
        }
    }

    fn create(app: &mut App, title: &str, description: &str) {
        app.dispatch(Action::StartCreate);
        type_text(app, title);
        app.dispatch(Action::NextField);
        app.dispatch(Action::NextField);
        type_text(app, description);
        app.dispatch(Action::Submit);
    }

    fn titles(app: &App) -> Vec<String> {
        app.store.list().iter().map(|p| p.title.clone()).collect()
    }

    #[test]
    fn test_create_post_from_form() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir, Route::List);

        create(&mut app, "First", "one");
        create(&mut app, "Second", "two");

        assert_eq!(titles(&app), vec!["Second", "First"]);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.form, PostForm::default());
        assert_eq!(app.store.list()[1].content, None);
        assert_ne!(app.store.list()[0].id, app.store.list()[1].id);
    }

    #[test]
    fn test_create_requires_fields() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir, Route::List);

        create(&mut app, "Only title", "");

        assert!(app.store.list().is_empty());
        assert_eq!(app.mode, AppMode::FillingForm);
        assert_eq!(app.message.as_deref(), Some(REQUIRED_FIELDS_MESSAGE));
        assert_eq!(app.form.draft.title, "Only title");
    }

    #[test]
    fn test_edit_moves_post_to_front() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir, Route::List);
        let t0 = Utc::now() - chrono::Duration::hours(1);
        app.store
            .add(Post::from_draft(1, PostDraft::new("A", "a", ""), t0))
            .unwrap();
        app.store
            .add(Post::from_draft(2, PostDraft::new("B", "b", ""), t0))
            .unwrap();

        app.navigate(Route::Edit(1));
        assert_eq!(app.mode, AppMode::FillingForm);
        assert_eq!(app.form.draft.title, "A");

        type_text(&mut app, " edited");
        app.dispatch(Action::Submit);

        assert_eq!(app.route, Route::Detail(1));
        let ids: Vec<i64> = app.store.list().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
        let edited = app.store.get(1).unwrap();
        assert_eq!(edited.title, "A edited");
        assert!(edited.created_at > t0);
    }

    #[test]
    fn test_cancel_edit_returns_to_detail() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir, Route::List);
        create(&mut app, "Keep", "me");
        let id = app.store.list()[0].id;

        app.dispatch(Action::OpenSelected);
        app.dispatch(Action::StartEdit);
        assert_eq!(app.route, Route::Edit(id));
        app.dispatch(Action::DeleteChar);
        app.dispatch(Action::Cancel);

        assert_eq!(app.route, Route::Detail(id));
        assert_eq!(app.store.get(id).unwrap().title, "Keep");
    }

    #[test]
    fn test_delete_from_detail_returns_to_list() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir, Route::List);
        create(&mut app, "Doomed", "soon");
        app.dispatch(Action::OpenSelected);

        app.dispatch(Action::StartDelete);
        assert!(matches!(app.mode, AppMode::Confirm(_)));
        app.dispatch(Action::Submit);

        assert_eq!(app.route, Route::List);
        assert!(app.store.list().is_empty());
    }

    #[test]
    fn test_cancel_delete_keeps_post() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir, Route::List);
        create(&mut app, "Safe", "yes");

        app.dispatch(Action::StartDelete);
        app.dispatch(Action::Cancel);

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(titles(&app), vec!["Safe"]);
    }

    #[test]
    fn test_edit_unknown_post_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir, Route::Edit(999_999));

        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.routed_post().is_none());
        app.dispatch(Action::Submit);
        assert!(app.store.list().is_empty());

        app.dispatch(Action::Back);
        assert_eq!(app.route, Route::Detail(999_999));
    }

    #[test]
    fn test_edit_route_prefilled_after_load() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut app = app_in(&dir, Route::List);
            create(&mut app, "Stored", "post");
        }
        let storage = LocalStorage::new(dir.path()).with_load_delay(Duration::from_millis(300));
        let id = {
            let mut store = PostStore::new(storage.clone());
            store.complete_load().unwrap();
            store.list()[0].id
        };

        let mut app = App::new(PostStore::new(storage), Route::Edit(id));
        assert!(app.store.is_loading());
        app.tick(Instant::now() + Duration::from_millis(301));

        assert_eq!(app.mode, AppMode::FillingForm);
        assert_eq!(app.form.draft.title, "Stored");
    }
}
