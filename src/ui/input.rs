//! 键盘事件映射 (Input -> Action)
//!
//! 将按键事件转换为 Action

use crossterm::event::KeyCode;

use super::actions::Action;
use super::state::{App, AppMode, Route};

/// 根据当前页面、模式和按键获取对应的 Action
pub fn get_action(route: &Route, mode: &AppMode, loading: bool, key: KeyCode) -> Option<Action> {
    // 加载中只允许退出
    if loading {
        return match key {
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        };
    }

    match mode {
        AppMode::Normal => match route {
            Route::List => match key {
                KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Char('j') | KeyCode::Down => Some(Action::MoveSelectionDown),
                KeyCode::Char('k') | KeyCode::Up => Some(Action::MoveSelectionUp),
                KeyCode::Enter => Some(Action::OpenSelected),
                KeyCode::Char('a') => Some(Action::StartCreate),
                KeyCode::Char('e') => Some(Action::StartEdit),
                KeyCode::Char('d') => Some(Action::StartDelete),
                _ => None,
            },
            Route::Detail(_) => match key {
                KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Char('e') => Some(Action::StartEdit),
                KeyCode::Char('d') => Some(Action::StartDelete),
                KeyCode::Esc | KeyCode::Char('b') => Some(Action::Back),
                _ => None,
            },
            Route::Edit(_) => match key {
                KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Esc | KeyCode::Char('b') => Some(Action::Back),
                _ => None,
            },
        },
        AppMode::FillingForm => match key {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Tab => Some(Action::NextField),
            KeyCode::BackTab => Some(Action::PrevField),
            KeyCode::Backspace => Some(Action::DeleteChar),
            KeyCode::Char(c) => Some(Action::Input(c)),
            _ => None,
        },
        AppMode::Confirm(_) => match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::Submit),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::Cancel),
            _ => None,
        },
    }
}

/// 处理按键事件，返回是否退出
pub fn handle_key_event(app: &mut App, key: KeyCode) -> bool {
    match get_action(&app.route, &app.mode, app.store.is_loading(), key) {
        Some(action) => app.dispatch(action),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::state::ConfirmAction;

    #[test]
    fn test_only_quit_while_loading() {
        let route = Route::List;
        assert_eq!(
            get_action(&route, &AppMode::Normal, true, KeyCode::Char('q')),
            Some(Action::Quit)
        );
        assert_eq!(
            get_action(&route, &AppMode::Normal, true, KeyCode::Char('a')),
            None
        );
    }

    #[test]
    fn test_form_keys_type_text() {
        let mode = AppMode::FillingForm;
        assert_eq!(
            get_action(&Route::List, &mode, false, KeyCode::Char('q')),
            Some(Action::Input('q'))
        );
        assert_eq!(
            get_action(&Route::Edit(1), &mode, false, KeyCode::BackTab),
            Some(Action::PrevField)
        );
    }

    #[test]
    fn test_detail_keys() {
        let route = Route::Detail(1);
        assert_eq!(
            get_action(&route, &AppMode::Normal, false, KeyCode::Esc),
            Some(Action::Back)
        );
        assert_eq!(
            get_action(&route, &AppMode::Normal, false, KeyCode::Char('j')),
            None
        );
    }

    #[test]
    fn test_confirm_keys() {
        let mode = AppMode::Confirm(ConfirmAction::Delete(1));
        assert_eq!(
            get_action(&Route::List, &mode, false, KeyCode::Char('Y')),
            Some(Action::Submit)
        );
        assert_eq!(
            get_action(&Route::List, &mode, false, KeyCode::Esc),
            Some(Action::Cancel)
        );
    }
}
