use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, TryRecvError};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use finder_core::{update, AppState, Msg};
use finder_engine::EngineHandle;
use finder_logging::{finder_info, set_search_generation};

use super::config::AppConfig;
use super::effects::{EffectRunner, RunOutcome};
use super::logging;
use super::persistence::SettingsPersistence;
use super::ui::console::{parse_command, ConsoleCommand, HELP};
use super::ui::render::render;

const IDLE_POLL: Duration = Duration::from_millis(20);

pub fn run_app() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("resolving working directory")?;
    let config = AppConfig::load(&cwd)?;
    logging::initialize(config.log_destination);
    finder_info!("finder_app starting in {:?}", cwd);

    let engine = EngineHandle::new(config.api_settings()).context("configuring the API client")?;
    let persistence = SettingsPersistence::open(&config.settings_path);
    let runner = EffectRunner::new(engine, persistence);

    let (line_tx, line_rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut app = ConsoleApp::new(runner);
    app.start();
    println!("Type 'help' for commands.");

    'session: loop {
        let mut busy = false;

        loop {
            match line_rx.try_recv() {
                Ok(line) => {
                    busy = true;
                    if !app.handle_line(&line) {
                        break 'session;
                    }
                }
                Err(TryRecvError::Empty) => break,
                // stdin closed: wait for a running search, then leave.
                Err(TryRecvError::Disconnected) => {
                    if !app.state.has_search_in_flight() {
                        break 'session;
                    }
                    break;
                }
            }
        }

        while let Some(msg) = app.runner.poll_event() {
            busy = true;
            app.dispatch(msg);
        }

        if app.session_ended {
            println!("Session ended: the credential was rejected. Set FINDER_API_TOKEN and restart.");
            break;
        }
        if !busy {
            thread::sleep(IDLE_POLL);
        }
    }

    app.dispatch(Msg::ViewClosed);
    finder_info!("finder_app exiting");
    Ok(())
}

struct ConsoleApp {
    state: AppState,
    runner: EffectRunner,
    session_ended: bool,
}

impl ConsoleApp {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
            session_ended: false,
        }
    }

    fn start(&mut self) {
        let settings = self.runner.load_settings();
        self.dispatch(Msg::SettingsRestored(settings));
        self.dispatch(Msg::RefreshRequested);
    }

    /// Returns `false` when the operator asked to quit.
    fn handle_line(&mut self, line: &str) -> bool {
        match parse_command(line) {
            Ok(ConsoleCommand::Quit) => return false,
            Ok(ConsoleCommand::Help) => println!("{HELP}"),
            Ok(ConsoleCommand::Dispatch(msgs)) => {
                for msg in msgs {
                    self.dispatch(msg);
                }
            }
            Err(err) => eprintln!("{err}"),
        }
        true
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        set_search_generation(state.search_generation());

        let view = state.view();
        if state.consume_dirty() {
            print!("{}", render(&view));
            let _ = io::stdout().flush();
        }
        self.state = state;

        if self.runner.run(effects) == RunOutcome::SessionEnded {
            self.session_ended = true;
        }
    }
}
