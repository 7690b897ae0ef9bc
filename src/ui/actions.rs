//! Action 枚举定义 (Intent)
//!
//! 用户交互转化为明确的语义化 Action

/// 用户操作枚举
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    MoveSelectionUp,
    MoveSelectionDown,

    // 页面跳转
    OpenSelected,
    Back,

    // 触发特定功能
    StartCreate,
    StartEdit,
    StartDelete,

    // 表单/通用交互
    NextField,   // Tab
    PrevField,   // Shift+Tab
    Cancel,      // Esc / n
    Submit,      // Enter / y
    Input(char), // 输入字符
    DeleteChar,  // Backspace
}
