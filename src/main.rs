mod app;
mod config;
mod persist;
mod sim;
mod ui;

use anyhow::{Context, Result};
use app::{App, FocusTarget};
use chrono::Utc;
use clap::Parser;
use config::Cli;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use persist::{SaveFile, game_state_from_save, load_for_startup, save_game};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use sim::achievement::AchievementRegistry;
use sim::engine::Engine;
use sim::offline::{OfflineReport, apply_offline};
use sim::tick::{EngineEvent, TICK_INTERVAL};
use sim::state::Screen;
use sim::{economy, worlds};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = cli.paths();
    init_tracing(&paths.log_file)?;

    let worlds = worlds::default_registry().context("invalid world catalog")?;
    let achievements = AchievementRegistry::with_defaults().context("invalid achievement catalog")?;

    let (save, writable) = if cli.fresh {
        info!("starting a fresh game");
        (SaveFile::default(), true)
    } else {
        let startup = load_for_startup(&paths.save_file)
            .with_context(|| format!("failed to load {}", paths.save_file.display()))?;
        (startup.save, startup.writable)
    };
    let save_path = writable.then(|| paths.save_file.clone());
    let mut state = game_state_from_save(&save, &worlds);
    let report = apply_offline(save.saved_at, Utc::now(), &mut state, &worlds);

    let mut app = App::new(save.settings.clone());
    if state.last_screen == Screen::World {
        if let Some(index) = worlds.ids().position(|id| id == state.last_world_id) {
            app.world_index = index;
            app.screen = Screen::World;
        }
    }
    let mut engine = Engine::new(state, worlds, achievements)
        .context("invalid buy-on catalog")?
        .with_earned(save.achievements);
    app.add_message("Welcome back to orbit.");
    if save_path.is_none() {
        app.add_message(format!(
            "Could not read {}; progress will not be saved this session.",
            paths.save_file.display()
        ));
    }
    announce_offline(&mut app, &engine, &report);

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, &mut app, &mut engine, save_path.as_deref()).await;

    sync_location(&app, &mut engine);
    let saved = match &save_path {
        Some(path) => save_game(engine.state(), engine.earned(), &app.settings, path),
        None => Ok(()),
    };
    let restored = restore_terminal(&mut terminal);
    if let Err(err) = &saved {
        warn!(%err, "save on quit failed");
    } else if save_path.is_some() {
        info!("saved on quit");
    }
    restored?;
    saved?;
    result
}

fn init_tracing(log_file: &Path) -> Result<()> {
    if let Some(parent) = log_file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("cannot open log file {}", log_file.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

fn announce_offline(app: &mut App, engine: &Engine, report: &OfflineReport) {
    if report.is_empty() {
        return;
    }
    let minutes = report.elapsed.as_secs() / 60;
    if let Some(world_id) = &report.world_id {
        let symbol = engine
            .worlds()
            .get(world_id)
            .map(|world| world.coin_symbol.as_str())
            .unwrap_or("");
        app.add_message(format!(
            "While away for {minutes}m you earned {}.",
            economy::format_coins(report.world_coins, symbol)
        ));
    } else {
        app.add_message(format!(
            "While away for {minutes}m you earned {}.",
            economy::format_coins(report.general_coins, "GC")
        ));
    }
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    engine: &mut Engine,
    save_path: Option<&Path>,
) -> Result<()> {
    let (input_tx, mut input_rx) = mpsc::unbounded_channel();
    task::spawn(async move {
        loop {
            match task::spawn_blocking(crossterm::event::read).await {
                Ok(Ok(event)) => {
                    if input_tx.send(event).is_err() {
                        break;
                    }
                }
                Ok(Err(_)) => break,
                Err(_) => break,
            }
        }
    });

    let mut last_tick = Instant::now();
    let mut should_quit = false;

    loop {
        terminal.draw(|f| ui::render(f, app, engine))?;
        if should_quit {
            break;
        }

        let timeout = TICK_INTERVAL
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));
        tokio::select! {
            Some(event) = input_rx.recv() => {
                if handle_event(event, app, engine) {
                    should_quit = true;
                }
                sync_location(app, engine);
            }
            _ = tokio::time::sleep(timeout) => {
                let delta = last_tick.elapsed();
                last_tick = Instant::now();
                for event in engine.tick(delta.as_secs_f64()) {
                    handle_engine_event(event, app, engine, save_path);
                }
            }
        }
    }

    Ok(())
}

fn handle_engine_event(
    event: EngineEvent,
    app: &mut App,
    engine: &mut Engine,
    save_path: Option<&Path>,
) {
    match event {
        EngineEvent::AchievementUnlocked { id } => {
            let name = engine
                .achievements()
                .display_name(&id, engine.earned())
                .unwrap_or(id.as_str())
                .to_string();
            app.add_message(format!("Achievement unlocked: {name}"));
        }
        EngineEvent::LevelUp { level } => {
            app.add_message(format!("Reached level {level}!"));
        }
        EngineEvent::AutosaveRequested => {
            let Some(path) = save_path else {
                return;
            };
            sync_location(app, engine);
            if let Err(err) = save_game(engine.state(), engine.earned(), &app.settings, path) {
                warn!(%err, "autosave failed");
                app.add_message(format!("Autosave failed: {err}"));
            }
        }
    }
}

fn sync_location(app: &App, engine: &mut Engine) {
    let world_id = ui::current_world(app, engine)
        .map(|world| world.id.clone())
        .unwrap_or_default();
    engine.set_location(app.screen, &world_id);
}

fn handle_event(event: Event, app: &mut App, engine: &mut Engine) -> bool {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key_event(key, app, engine),
        _ => false,
    }
}

fn handle_key_event(key: KeyEvent, app: &mut App, engine: &mut Engine) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    if app.achievements_open {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Char('a') | KeyCode::Char('A')
        ) {
            app.toggle_achievements();
        }
        return false;
    }

    let Some(world_id) = ui::current_world(app, engine).map(|world| world.id.clone()) else {
        return matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'));
    };

    // Actions on a world only apply while its screen is showing.
    let on_world = app.screen == Screen::World;
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        KeyCode::Char('a') | KeyCode::Char('A') => app.toggle_achievements(),
        KeyCode::Char('o') | KeyCode::Char('O') => app.toggle_overview(),
        KeyCode::Tab => app.next_world(engine.worlds().len()),
        KeyCode::Char(' ') if on_world => {
            engine.handle_click(&world_id, 1.0);
        }
        KeyCode::Left => app.set_focus(FocusTarget::BuyOns),
        KeyCode::Right => app.set_focus(FocusTarget::Upgrades),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => move_selection(app, engine, -1),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => move_selection(app, engine, 1),
        KeyCode::Enter if on_world => match app.focus() {
            FocusTarget::BuyOns => buy_selected_buy_on(app, engine, &world_id),
            FocusTarget::Upgrades => buy_selected_upgrade(app, engine, &world_id),
        },
        KeyCode::Char('u') | KeyCode::Char('U') if on_world => buy_selected_upgrade(app, engine, &world_id),
        KeyCode::Char('p') | KeyCode::Char('P') if on_world => match engine.execute_prestige(&world_id) {
            Ok(reward) => app.add_message(format!(
                "Prestiged! Multiplier now x{:.2}, +{:.2} GC, +{} XP.",
                reward.multiplier, reward.general_coins, reward.xp
            )),
            Err(err) => app.add_message(format!("Cannot prestige: {err}")),
        },
        KeyCode::Char('e') | KeyCode::Char('E') if on_world => match engine.execute_exchange_boost(&world_id) {
            Ok(result) => app.add_message(format!(
                "Exchanged for {:.3} GC; rate now {:.5}.",
                result.general_coins_earned, result.new_exchange_rate
            )),
            Err(err) => app.add_message(format!("Cannot exchange: {err}")),
        },
        _ => {}
    }
    false
}

fn move_selection(app: &mut App, engine: &Engine, delta: isize) {
    if app.screen == Screen::Overview {
        let len = engine.worlds().len();
        if len > 0 {
            app.world_index = (app.world_index as isize + delta).rem_euclid(len as isize) as usize;
        }
        return;
    }
    let Some(world) = ui::current_world(app, engine) else {
        return;
    };
    let len = match app.focus() {
        FocusTarget::BuyOns => world.buy_ons.len(),
        FocusTarget::Upgrades => world.upgrades.len(),
    };
    app.move_selection(delta, len);
}

fn buy_selected_buy_on(app: &mut App, engine: &mut Engine, world_id: &str) {
    let Some(buy_on) = ui::current_world(app, engine)
        .and_then(|world| world.buy_ons.get(app.selected_buy_on))
        .map(|buy_on| (buy_on.id.clone(), buy_on.name.clone()))
    else {
        return;
    };
    match engine.purchase_buy_on(world_id, &buy_on.0) {
        Ok(cost) => app.add_message(format!(
            "Bought {} for {}.",
            buy_on.1,
            economy::format_coins_bare(cost)
        )),
        Err(err) => app.add_message(format!("Cannot buy {}: {err}", buy_on.1)),
    }
}

fn buy_selected_upgrade(app: &mut App, engine: &mut Engine, world_id: &str) {
    let Some(upgrade) = ui::current_world(app, engine)
        .and_then(|world| world.upgrades.get(app.selected_upgrade))
        .map(|upgrade| (upgrade.id.clone(), upgrade.name.clone()))
    else {
        return;
    };
    match engine.purchase_upgrade(world_id, &upgrade.0) {
        Ok(_) => app.add_message(format!("Installed {}.", upgrade.1)),
        Err(err) => app.add_message(format!("Cannot install {}: {err}", upgrade.1)),
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
