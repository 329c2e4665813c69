use std::{fmt, future::Future, sync::Arc};

use bollard::{
    container::{ListContainersOptions, RemoveContainerOptions},
    image::{ListImagesOptions, RemoveImageOptions},
    Docker, API_DEFAULT_VERSION,
};
use parking_lot::Mutex;
use tokio::{
    sync::mpsc::{Receiver, Sender},
    task::JoinHandle,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    app_data::{
        short_id, AppEvent, CleanupItem, CleanupSummary, ContainerRecord, ImageRecord, ItemKind,
    },
    app_error::AppError,
    parse_args::CliArgs,
    ui::GuiState,
};

mod message;
pub use message::DockerMessage;

/// Seconds to wait for the daemon before a request is considered failed
const CONNECTION_TIMEOUT: u64 = 120;

/// Why a single request to the docker daemon failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    Connection(String),
    Daemon(String),
}

/// Only transport failures mean the daemon can't be reached, anything else came from the daemon itself
impl From<bollard::errors::Error> for InventoryError {
    fn from(err: bollard::errors::Error) -> Self {
        use bollard::errors::Error;
        match err {
            Error::DockerResponseServerError { message, .. } => Self::Daemon(message),
            e @ (Error::IOError { .. }
            | Error::HyperResponseError { .. }
            | Error::HttpClientError { .. }
            | Error::RequestTimeoutError) => Self::Connection(e.to_string()),
            e => Self::Daemon(e.to_string()),
        }
    }
}

impl fmt::Display for InventoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection(reason) => write!(f, "docker daemon unreachable: {reason}"),
            Self::Daemon(reason) => write!(f, "{reason}"),
        }
    }
}

/// Thin wrapper around the bollard client, only the four calls this app needs, plus a ping
#[derive(Debug, Clone)]
pub struct InventoryClient {
    docker: Docker,
    all_images: bool,
}

impl InventoryClient {
    /// Connect using the `--host` argument if given, else DOCKER_HOST or the default local socket
    pub fn connect(args: &CliArgs) -> Result<Self, InventoryError> {
        let docker = match args.host.as_deref() {
            Some(host) if host.starts_with("tcp://") || host.starts_with("http://") => {
                Docker::connect_with_http(host, CONNECTION_TIMEOUT, API_DEFAULT_VERSION)
            }
            Some(host) => Docker::connect_with_socket(
                host.trim_start_matches("unix://"),
                CONNECTION_TIMEOUT,
                API_DEFAULT_VERSION,
            ),
            None => Docker::connect_with_local_defaults(),
        }?;
        Ok(Self {
            docker,
            all_images: args.all_images,
        })
    }

    pub async fn ping(&self) -> Result<(), InventoryError> {
        self.docker.ping().await?;
        Ok(())
    }

    pub async fn list_images(&self) -> Result<Vec<ImageRecord>, InventoryError> {
        let images = self
            .docker
            .list_images(Some(ListImagesOptions::<String> {
                all: self.all_images,
                ..Default::default()
            }))
            .await?;
        Ok(images.into_iter().map(ImageRecord::from).collect())
    }

    pub async fn list_containers(&self) -> Result<Vec<ContainerRecord>, InventoryError> {
        let containers = self
            .docker
            .list_containers(Some(ListContainersOptions::<String> {
                all: true,
                ..Default::default()
            }))
            .await?;
        Ok(containers.into_iter().map(ContainerRecord::from).collect())
    }

    pub async fn remove_image(&self, id: &str) -> Result<(), InventoryError> {
        self.docker
            .remove_image(id, None::<RemoveImageOptions>, None)
            .await?;
        Ok(())
    }

    /// Force removal, so running containers are also removed
    pub async fn remove_container(&self, id: &str) -> Result<(), InventoryError> {
        self.docker
            .remove_container(
                id,
                Some(RemoveContainerOptions {
                    force: true,
                    ..Default::default()
                }),
            )
            .await?;
        Ok(())
    }

    /// Remove a single item of either kind
    async fn remove(&self, item: &CleanupItem) -> Result<(), InventoryError> {
        match item.kind {
            ItemKind::Image => self.remove_image(&item.id).await,
            ItemKind::Container => self.remove_container(&item.id).await,
        }
    }
}

/// Remove items one at a time, in selection order, stopping at the first failure
async fn remove_all<F, Fut>(
    items: Vec<CleanupItem>,
    mut remove: F,
) -> Result<CleanupSummary, AppError>
where
    F: FnMut(CleanupItem) -> Fut,
    Fut: Future<Output = Result<(), InventoryError>>,
{
    let mut summary = CleanupSummary::default();
    for item in items {
        debug!("removing {} {}", item.kind, item.id);
        if let Err(source) = remove(item.clone()).await {
            warn!("unable to remove {} {}: {source}", item.kind, item.id);
            return Err(AppError::Remove {
                kind: item.kind,
                id: short_id(&item.id),
                source,
            });
        }
        summary.record(item.kind);
    }
    Ok(summary)
}

/// Receives DockerMessages from the ui loop, spawns a task per request, and sends the results back as AppEvents
pub struct DockerData {
    client: Arc<InventoryClient>,
    event_sender: Sender<AppEvent>,
    gui_state: Arc<Mutex<GuiState>>,
    receiver: Receiver<DockerMessage>,
    spawns: Vec<JoinHandle<()>>,
}

impl DockerData {
    /// Initialize self, and run the message handling loop
    pub async fn init(
        client: InventoryClient,
        event_sender: Sender<AppEvent>,
        gui_state: Arc<Mutex<GuiState>>,
        receiver: Receiver<DockerMessage>,
    ) {
        let mut inner = Self {
            client: Arc::new(client),
            event_sender,
            gui_state,
            receiver,
            spawns: vec![],
        };
        inner.message_handler().await;
    }

    /// Spawn a request, showing the loading icon until it has completed
    fn spawn_request<F>(&mut self, request: F)
    where
        F: Future<Output = AppEvent> + Send + 'static,
    {
        let uuid = Uuid::new_v4();
        self.gui_state.lock().next_loading(uuid);
        let gui_state = Arc::clone(&self.gui_state);
        let event_sender = self.event_sender.clone();
        self.spawns.retain(|i| !i.is_finished());
        self.spawns.push(tokio::spawn(async move {
            let event = request.await;
            gui_state.lock().remove_loading(uuid);
            event_sender.send(event).await.ok();
        }));
    }

    /// Fetch images & containers, as two independent requests
    fn fetch(&mut self) {
        debug!("fetching images & containers");
        let client = Arc::clone(&self.client);
        self.spawn_request(async move {
            match client.list_images().await {
                Ok(images) => AppEvent::ImagesFetched(images),
                Err(e) => {
                    warn!("unable to list images: {e}");
                    AppEvent::FetchFailed(AppError::Fetch(ItemKind::Image, e))
                }
            }
        });
        let client = Arc::clone(&self.client);
        self.spawn_request(async move {
            match client.list_containers().await {
                Ok(containers) => AppEvent::ContainersFetched(containers),
                Err(e) => {
                    warn!("unable to list containers: {e}");
                    AppEvent::FetchFailed(AppError::Fetch(ItemKind::Container, e))
                }
            }
        });
    }

    fn cleanup(&mut self, items: Vec<CleanupItem>) {
        let client = Arc::clone(&self.client);
        self.spawn_request(async move {
            let remove = |item: CleanupItem| {
                let client = Arc::clone(&client);
                async move { client.remove(&item).await }
            };
            match remove_all(items, remove).await {
                Ok(summary) => {
                    info!("{summary}");
                    AppEvent::CleanupCompleted(summary)
                }
                Err(e) => AppEvent::CleanupFailed(e),
            }
        });
    }

    /// Handle incoming messages, until a Quit message is received or the sender is dropped
    async fn message_handler(&mut self) {
        while let Some(message) = self.receiver.recv().await {
            match message {
                DockerMessage::Fetch => self.fetch(),
                DockerMessage::Cleanup(items) => self.cleanup(items),
                DockerMessage::Quit => {
                    self.spawns.iter().for_each(JoinHandle::abort);
                    break;
                }
            }
        }
    }
}
