#![forbid(unsafe_code)]
#![warn(clippy::unused_async)]

use std::{fs::File, process, sync::Arc};

use app_data::AppData;
use docker_data::{DockerData, InventoryClient};
use parking_lot::Mutex;
use parse_args::CliArgs;
use tracing::{error, info, Level};
use ui::{GuiState, Status, Ui};

mod app_data;
mod app_error;
mod docker_data;
mod input_handler;
mod parse_args;
mod ui;

/// Capacity of both the DockerMessage & AppEvent channels
const CHANNEL_SIZE: usize = 32;

/// Only log to a file, as anything written to stdout/stderr would be drawn over the gui
fn setup_tracing(args: &CliArgs) {
    let Some(path) = &args.log_file else {
        return;
    };
    match File::create(path) {
        Ok(file) => {
            let level = if args.verbose {
                Level::DEBUG
            } else {
                Level::INFO
            };
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        Err(e) => eprintln!("unable to open log file {}: {e}", path.display()),
    }
}

#[tokio::main]
async fn main() {
    let args = CliArgs::new();
    setup_tracing(&args);

    let gui_state = Arc::new(Mutex::new(GuiState::default()));
    gui_state.lock().status_push(Status::Init);

    let (docker_sx, docker_rx) = tokio::sync::mpsc::channel(CHANNEL_SIZE);
    let (event_sx, event_rx) = tokio::sync::mpsc::channel(CHANNEL_SIZE);

    let client = match InventoryClient::connect(&args) {
        Ok(client) => match client.ping().await {
            Ok(()) => Some(client),
            Err(e) => {
                info!("ping failed: {e}");
                None
            }
        },
        Err(e) => {
            info!("unable to connect: {e}");
            None
        }
    };

    if let Some(client) = client {
        let docker_gui_state = Arc::clone(&gui_state);
        tokio::spawn(DockerData::init(
            client,
            event_sx,
            docker_gui_state,
            docker_rx,
        ));
    } else {
        gui_state.lock().status_push(Status::DockerConnect);
    }

    if let Err(e) = Ui::create(AppData::default(), docker_sx, event_rx, gui_state).await {
        error!("{e}");
        eprintln!("{e}");
        process::exit(1);
    }
}
