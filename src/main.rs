mod config;
mod error;
mod logging;
mod models;
mod storage;
mod store;
mod ui;

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::info;
use ratatui::prelude::*;

use crate::config::Config;
use crate::storage::LocalStorage;
use crate::store::PostStore;
use crate::ui::{App, Route, render};

/// 事件轮询间隔，同时决定加载延迟的精度
const TICK_RATE: Duration = Duration::from_millis(50);

#[derive(Parser, Debug)]
#[command(name = "miniblog", version, about = "A small terminal blog kept on your own disk")]
struct Cli {
    /// 配置文件路径 (默认 ~/.config/miniblog/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// 数据目录 (默认 ~/.local/share/miniblog/)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// 启动加载延迟（毫秒）
    #[arg(long)]
    load_delay_ms: Option<u64>,

    #[arg(long)]
    log_level: Option<String>,

    /// 启动时打开的页面，例如 /post/1700000000000
    #[arg(long, default_value = "/")]
    open: String,
}

impl Cli {
    /// 命令行参数覆盖配置文件
    fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.data_dir {
            config.data_dir = Some(dir.clone());
        }
        if let Some(ms) = self.load_delay_ms {
            config.load_delay_ms = ms;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };
    let mut config = Config::load_from(&config_path)?;
    cli.apply(&mut config);

    let route = Route::parse(&cli.open).ok_or_else(|| anyhow!("unknown route `{}`", cli.open))?;

    // 数据目录 (~/.local/share/miniblog/)
    let data_dir = config.resolve_data_dir()?;
    fs::create_dir_all(&data_dir)?;
    let _logger = logging::init_logging(&config.log_level, &data_dir.join("logs"))?;

    let storage = LocalStorage::new(&data_dir).with_load_delay(config.load_delay());
    info!(
        "event=store_open module=main status=ok data_dir={} load_delay_ms={} route={route}",
        data_dir.display(),
        config.load_delay_ms
    );

    // 创建应用状态
    let mut app = App::new(PostStore::new(storage), route);

    // 设置终端
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 主循环
    let result = run_app(&mut terminal, &mut app);

    // 恢复终端
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!(
        "event=app_exit module=main status=ok posts={}",
        app.store.list().len()
    );

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.tick(Instant::now());
        terminal.draw(|f| render(f, app))?;

        if !event::poll(TICK_RATE)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && ui::handle_key_event(app, key.code) {
                break;
            }
        }
    }
    Ok(())
}
