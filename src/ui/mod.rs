use std::{
    io::{self, Stdout},
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use parking_lot::Mutex;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use tokio::sync::mpsc::{Receiver, Sender};
use tracing::{debug, error};

use crate::{
    app_data::{AppData, AppEvent},
    app_error::AppError,
    docker_data::DockerMessage,
    input_handler,
};

pub use self::gui_state::{GuiState, Status};

mod color_match;
mod draw_blocks;
mod gui_state;

pub struct Ui {
    app_data: AppData,
    docker_sx: Sender<DockerMessage>,
    event_rx: Receiver<AppEvent>,
    gui_state: Arc<Mutex<GuiState>>,
    is_running: bool,
    now: Instant,
    tick_rate: Duration,
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Ui {
    /// Create a new Ui struct, and execute the drawing loop.
    /// The terminal is always reset before returning
    pub async fn create(
        app_data: AppData,
        docker_sx: Sender<DockerMessage>,
        event_rx: Receiver<AppEvent>,
        gui_state: Arc<Mutex<GuiState>>,
    ) -> Result<(), AppError> {
        let Ok(terminal) = Self::setup_terminal() else {
            error!("Terminal Error");
            return Err(AppError::Terminal);
        };
        let mut ui = Self {
            app_data,
            docker_sx,
            event_rx,
            gui_state,
            is_running: true,
            now: Instant::now(),
            tick_rate: Duration::from_millis(100),
            terminal,
        };
        let result = ui.draw_ui().await;
        if let Err(e) = ui.reset_terminal() {
            error!("{e}");
        }
        result
    }

    /// Setup the terminal for full-screen drawing mode
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        Ok(Terminal::new(backend)?)
    }

    /// reset the terminal back to default settings
    pub fn reset_terminal(&mut self) -> Result<()> {
        self.terminal.clear()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        disable_raw_mode()?;
        Ok(self.terminal.show_cursor()?)
    }

    /// Draw the error message ui, for 5 seconds, with a countdown
    async fn err_loop(&mut self) -> Result<(), AppError> {
        let mut seconds = 5;
        loop {
            if self.now.elapsed() >= Duration::from_secs(1) {
                seconds -= 1;
                self.now = Instant::now();
                if seconds < 1 {
                    break;
                }
            }

            if self
                .terminal
                .draw(|f| draw_blocks::error(f, &AppError::DockerConnect, Some(seconds)))
                .is_err()
            {
                return Err(AppError::Terminal);
            }
            tokio::time::sleep(self.tick_rate).await;
        }
        Err(AppError::DockerConnect)
    }

    /// Apply a single event to the app_data, and forward any resulting message to the docker task
    async fn dispatch(&mut self, event: AppEvent) {
        if matches!(
            event,
            AppEvent::ImagesFetched(_) | AppEvent::ContainersFetched(_) | AppEvent::FetchFailed(_)
        ) {
            self.gui_state.lock().status_del(Status::Init);
        }
        if let Some(message) = self.app_data.update(event) {
            if matches!(message, DockerMessage::Quit) {
                self.is_running = false;
            }
            debug!("sending {message:?}");
            if self.docker_sx.send(message).await.is_err() {
                error!("docker task has stopped");
            }
        }
    }

    /// The loop for drawing the main UI to the terminal.
    /// Each event is fully applied, then the frame redrawn, before the next is accepted
    async fn gui_loop(&mut self) -> Result<(), AppError> {
        let mut input = EventStream::new();
        let mut ticker = tokio::time::interval(self.tick_rate);

        self.docker_sx.send(DockerMessage::Fetch).await.ok();

        while self.is_running {
            if self
                .terminal
                .draw(|frame| draw_frame(frame, &self.app_data, &self.gui_state))
                .is_err()
            {
                return Err(AppError::Terminal);
            }

            let event = tokio::select! {
                Some(Ok(event)) = input.next() => match event {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        input_handler::button_press(key.code, key.modifiers)
                    }
                    Event::Resize(_, _) => {
                        self.terminal.autoresize().ok();
                        None
                    }
                    _ => None,
                },
                Some(event) = self.event_rx.recv() => Some(event),
                _ = ticker.tick() => {
                    self.gui_state.lock().tick_loading();
                    None
                }
            };

            if let Some(event) = event {
                self.dispatch(event).await;
            }
        }
        Ok(())
    }

    /// Draw either the Error, or main ui, to the terminal
    async fn draw_ui(&mut self) -> Result<(), AppError> {
        let status_dockerconnect = self
            .gui_state
            .lock()
            .status_contains(&[Status::DockerConnect]);
        if status_dockerconnect {
            self.err_loop().await
        } else {
            self.gui_loop().await
        }
    }
}

/// Draw the main ui to a frame of the terminal
fn draw_frame<B: Backend>(
    f: &mut Frame<'_, B>,
    app_data: &AppData,
    gui_state: &Arc<Mutex<GuiState>>,
) {
    let (loading_icon, is_init) = {
        let gui_state = gui_state.lock();
        (
            gui_state.get_loading(),
            gui_state.status_contains(&[Status::Init]),
        )
    };

    let status_height = draw_blocks::status_height(app_data, f.size().width);
    let whole_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(status_height)])
        .split(f.size());

    draw_blocks::rows(f, whole_layout[0], app_data, &loading_icon, is_init);
    draw_blocks::status(f, whole_layout[1], app_data, &loading_icon);
}
