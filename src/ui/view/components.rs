//! 通用 UI 组件
//!
//! 对话框、输入框、表单等通用组件

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::ui::state::{FormField, PostForm};

/// [组件] 弹窗基础框架
pub fn render_dialog_framework(frame: &mut Frame, area: Rect, title: &str) -> Rect {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::Red));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// [组件] 带有标题和样式的输入框
pub fn render_input_widget(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    value: &str,
    is_focused: bool,
    active_color: Color,
) {
    let style = if is_focused {
        Style::default()
            .fg(active_color)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let input = Paragraph::new(value)
        .style(style)
        .wrap(Wrap { trim: false })
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(input, area);
}

/// [组件] 帖子表单：标题、正文（可选）、描述
pub fn render_post_form(frame: &mut Frame, area: Rect, title: &str, form: &PostForm, active: bool) {
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .split(inner);

    let fields = [
        (FormField::Title, "Title * (required)"),
        (FormField::Content, "Content (optional)"),
        (FormField::Description, "Description * (required)"),
    ];
    for (chunk, (field, label)) in chunks.iter().zip(fields) {
        render_input_widget(
            frame,
            *chunk,
            label,
            form.value(field),
            active && form.focused == field,
            Color::Yellow,
        );
    }
}

/// [组件] 找不到帖子
pub fn render_not_found(frame: &mut Frame, area: Rect, id: i64) {
    let text = format!("Post not found.\n\nNo post with id {id}. Press [b] to go back.");
    let widget = Paragraph::new(text)
        .style(Style::default().fg(Color::Red))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(widget, area);
}
