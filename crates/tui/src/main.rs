use std::{fs::File, io, panic, rc::Rc};

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, error};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use simplelog::WriteLogger;
use xdg::BaseDirectories;

mod auth_cache;
mod config;
mod event;
mod login_prompt;
mod main_screen;
mod store;
mod styles;
mod widgets;

use auth_cache::AuthCache;
use config::Config;
use event::{Event, EventBus};
use login_prompt::LoginPrompt;
use main_screen::MainScreen;

/// A full-screen view, which takes over drawing and event handling until it exits
pub trait Screen {
    fn draw(&mut self, frame: &mut Frame);
    fn handle_event(&mut self, event: Event) -> Result<ExitState>;
}

/// What the main loop should do after an event has been handled
pub enum ExitState {
    Running,
    Quit,
    ChangeScreen(Box<dyn Screen>),
}

fn main() -> Result<()> {
    init_logging()?;
    let config = Config::load().context("error loading config")?;
    debug!("using endpoints {:?}", config.endpoints);

    let events = Rc::new(EventBus::new());
    events.spawn_terminal_listener()?;

    let mut screen: Box<dyn Screen> = match AuthCache::load() {
        Ok(cache) => Box::new(MainScreen::with_client(
            events.clone(),
            cache.into_client(config.endpoints.clone()),
            true,
        )?),
        Err(e) => {
            debug!("no usable auth cache: {:#}", e);
            Box::new(LoginPrompt::new(events.clone(), config.clone()))
        }
    };

    let mut terminal = Terminal::new(CrosstermBackend::new(io::stderr()))?;
    enter_terminal(&mut terminal)?;

    let res = run(&mut terminal, &events, &mut screen);

    leave_terminal(&mut terminal)?;
    if let Err(e) = &res {
        error!("exiting with error: {:#}", e);
    }

    res
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    events: &EventBus,
    screen: &mut Box<dyn Screen>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| screen.draw(frame))?;

        match screen.handle_event(events.next()?)? {
            ExitState::Running => (),
            ExitState::Quit => return Ok(()),
            ExitState::ChangeScreen(next) => *screen = next,
        }
    }
}

/// Log to a file in the cache directory, since stderr is taken up by the interface.
/// The level can be set with `AULA_LOG`, and defaults to info.
fn init_logging() -> Result<()> {
    let level = std::env::var("AULA_LOG")
        .ok()
        .and_then(|l| l.parse().ok())
        .unwrap_or(log::LevelFilter::Info);

    let path = BaseDirectories::with_prefix("aula")?
        .place_cache_file("aula.log")
        .context("error creating cache directory")?;
    let file = File::create(path).context("error creating log file")?;

    WriteLogger::init(level, simplelog::Config::default(), file)
        .context("error initialising logger")?;

    Ok(())
}

fn enter_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stderr>>) -> Result<()> {
    terminal::enable_raw_mode()?;
    crossterm::execute!(io::stderr(), EnterAlternateScreen, EnableMouseCapture)?;

    // Put the terminal back before printing any panic
    let hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if let Err(e) = reset_terminal() {
            eprintln!("error resetting terminal: {}", e);
        }
        hook(info);
    }));

    terminal.hide_cursor()?;
    terminal.clear()?;

    Ok(())
}

fn reset_terminal() -> Result<()> {
    terminal::disable_raw_mode()?;
    crossterm::execute!(io::stderr(), LeaveAlternateScreen, DisableMouseCapture)?;

    Ok(())
}

fn leave_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stderr>>) -> Result<()> {
    reset_terminal()?;
    terminal.show_cursor()?;

    Ok(())
}
