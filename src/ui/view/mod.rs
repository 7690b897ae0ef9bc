//! 视图层模块
//!
//! 包含主渲染入口和三个页面：列表+新建、详情、编辑

pub mod components;
pub mod layouts;

use chrono::Local;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use super::state::{App, AppMode, ConfirmAction, Route};
use crate::models::Post;
use components::{render_dialog_framework, render_not_found, render_post_form};
use layouts::centered_rect;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// 渲染 UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // 标题
            Constraint::Min(10),   // 页面
            Constraint::Length(3), // 帮助
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);

    if app.store.is_loading() {
        render_loading(frame, chunks[1]);
    } else {
        match app.route {
            Route::List => render_list_page(frame, app, chunks[1]),
            Route::Detail(id) => render_detail_page(frame, app, id, chunks[1]),
            Route::Edit(id) => render_edit_page(frame, app, id, chunks[1]),
        }
    }

    render_help(frame, app, chunks[2]);

    if let AppMode::Confirm(action) = &app.mode {
        render_confirm_dialog(frame, app, action);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let subtitle = match app.route {
        Route::List => "Write, read and manage your posts",
        Route::Detail(_) => "Post",
        Route::Edit(_) => "Edit post",
    };
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "MINIBLOG",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle, Style::default().fg(Color::Gray))),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let loading = Paragraph::new("Loading posts...")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(loading, area);
}

fn render_list_page(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_post_list(frame, app, chunks[0]);
    render_post_form(
        frame,
        chunks[1],
        "New post",
        &app.form,
        app.mode == AppMode::FillingForm,
    );
}

fn render_post_list(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!("Posts ({})", app.store.list().len()))
        .borders(Borders::ALL);

    if app.store.list().is_empty() {
        let empty = Paragraph::new("No posts yet. Press 'a' to write the first one.")
            .style(Style::default().fg(Color::Gray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .store
        .list()
        .iter()
        .enumerate()
        .map(|(i, post)| {
            let title_style = if i == app.selected_index {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };

            ListItem::new(vec![
                Line::from(Span::styled(post.title.clone(), title_style)),
                Line::from(Span::styled(
                    post.description.clone(),
                    Style::default().fg(Color::Gray),
                )),
                Line::from(Span::styled(
                    format_time(post),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_detail_page(frame: &mut Frame, app: &App, id: i64, area: Rect) {
    let Some(post) = app.store.get(id) else {
        render_not_found(frame, area, id);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            post.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format_time(post),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(post.description.clone()),
    ];
    if let Some(body) = post.body() {
        lines.push(Line::from(""));
        lines.extend(body.lines().map(|l| Line::from(l.to_string())));
    }

    let detail = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().title("Detail").borders(Borders::ALL));
    frame.render_widget(detail, area);
}

fn render_edit_page(frame: &mut Frame, app: &App, id: i64, area: Rect) {
    if app.store.get(id).is_none() {
        render_not_found(frame, area, id);
        return;
    }
    render_post_form(
        frame,
        area,
        "Edit post",
        &app.form,
        app.mode == AppMode::FillingForm,
    );
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = if app.store.is_loading() {
        "[q] Quit"
    } else {
        match (&app.mode, &app.route) {
            (AppMode::Normal, Route::List) => {
                "[a] New  [Enter] Open  [e] Edit  [d] Delete  [j/k] Navigate  [q] Quit"
            }
            (AppMode::Normal, Route::Detail(_)) => "[e] Edit  [d] Delete  [b] Back  [q] Quit",
            (AppMode::Normal, Route::Edit(_)) => "[b] Back  [q] Quit",
            (AppMode::FillingForm, Route::Edit(_)) => {
                "[Tab] Next field  [Enter] Save  [Esc] Cancel"
            }
            (AppMode::FillingForm, _) => "[Tab] Next field  [Enter] Publish  [Esc] Cancel",
            (AppMode::Confirm(_), _) => "[y] Confirm  [n] Cancel",
        }
    };

    let message = app.message.as_deref().unwrap_or("");
    let text = if message.is_empty() {
        help_text.to_string()
    } else {
        format!("{}  |  {}", help_text, message)
    };

    let help = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, area);
}

fn render_confirm_dialog(frame: &mut Frame, app: &App, action: &ConfirmAction) {
    let area = centered_rect(50, 25, frame.area());
    let inner = render_dialog_framework(frame, area, "Delete post");

    let ConfirmAction::Delete(id) = action;
    let title = app
        .store
        .get(*id)
        .map(|p| p.title.as_str())
        .unwrap_or("this post");

    let dialog = Paragraph::new(format!(
        "Are you sure you want to delete \"{}\"?\nThis cannot be undone.\n\n[y] Delete  [n] Cancel",
        title
    ))
    .wrap(Wrap { trim: true })
    .style(Style::default().fg(Color::Red));

    frame.render_widget(dialog, inner);
}

fn format_time(post: &Post) -> String {
    post.created_at
        .with_timezone(&Local)
        .format(TIME_FORMAT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PostDraft;
    use crate::storage::LocalStorage;
    use crate::store::PostStore;
    use chrono::Utc;
    use ratatui::{Terminal, backend::TestBackend};
    use std::time::{Duration, Instant};

    fn screen_text(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn make_app(dir: &tempfile::TempDir, delay: Duration, route: Route) -> App {
        let storage = LocalStorage::new(dir.path()).with_load_delay(delay);
        App::new(PostStore::new(storage), route)
    }

    #[test]
    fn test_loading_screen() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = make_app(&dir, Duration::from_secs(60), Route::List);
        assert!(screen_text(&mut app).contains("Loading posts..."));
    }

    #[test]
    fn test_detail_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = make_app(&dir, Duration::ZERO, Route::Detail(999_999));
        app.tick(Instant::now());
        assert!(screen_text(&mut app).contains("Post not found."));
    }

    #[test]
    fn test_edit_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = make_app(&dir, Duration::ZERO, Route::Edit(999_999));
        app.tick(Instant::now());
        assert!(screen_text(&mut app).contains("Post not found."));
    }

    #[test]
    fn test_list_shows_posts_and_confirm_dialog() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = make_app(&dir, Duration::ZERO, Route::List);
        app.tick(Instant::now());
        app.store
            .add(Post::from_draft(1, PostDraft::new("Hello", "World", ""), Utc::now()))
            .unwrap();

        let text = screen_text(&mut app);
        assert!(text.contains("Hello"));
        assert!(text.contains("Posts (1)"));

        app.start_delete();
        assert!(screen_text(&mut app).contains("Delete post"));
    }
}
