use serde::Deserialize;
use tokio::{
    sync::{broadcast, mpsc, oneshot},
    time::{Duration, sleep},
};
use tracing::{debug, warn};

use crate::{
    auth::AuthError,
    core::{
        catalog::CatalogSource,
        queue::{QueueError, SaveReceipt},
    },
    item::FoodItem,
    notice::Notice,
    persist::PersistError,
    session::{Applied, Session, SessionError},
    types::{Decision, ItemId, QueueStatus},
    user::{User, UserMatch},
};

use super::events::SessionEvent;

#[derive(Debug)]
pub enum RuntimeError {
    Session(SessionError),
    ChannelClosed,
}

impl From<SessionError> for RuntimeError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

impl From<QueueError> for RuntimeError {
    fn from(value: QueueError) -> Self {
        Self::Session(SessionError::Queue(value))
    }
}

impl From<AuthError> for RuntimeError {
    fn from(value: AuthError) -> Self {
        Self::Session(SessionError::Auth(value))
    }
}

impl From<PersistError> for RuntimeError {
    fn from(value: PersistError) -> Self {
        Self::Session(SessionError::Persist(value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub fetch_latency_ms: u64,
    pub auth_latency_ms: u64,
    pub fetch_on_start: bool,
    pub command_queue_bound: usize,
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            fetch_latency_ms: 1000,
            auth_latency_ms: 800,
            fetch_on_start: true,
            command_queue_bound: 256,
            event_capacity: 1024,
        }
    }
}

impl RuntimeConfig {
    /// No artificial latency; handy for tests and headless use.
    pub fn immediate() -> Self {
        Self {
            fetch_latency_ms: 0,
            auth_latency_ms: 0,
            ..Self::default()
        }
    }
}

#[derive(Clone)]
pub struct SessionHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<SessionEvent>,
}

enum Command {
    Fetch {
        resp: oneshot::Sender<Result<usize, RuntimeError>>,
    },
    Save {
        item: FoodItem,
        resp: oneshot::Sender<Result<FoodItem, RuntimeError>>,
    },
    Skip {
        resp: oneshot::Sender<Result<Option<FoodItem>, RuntimeError>>,
    },
    Remove {
        id: ItemId,
        resp: oneshot::Sender<Result<Option<FoodItem>, RuntimeError>>,
    },
    Decide {
        decision: Decision,
        resp: oneshot::Sender<Result<Option<Applied>, RuntimeError>>,
    },
    Current {
        resp: oneshot::Sender<Option<FoodItem>>,
    },
    Saved {
        resp: oneshot::Sender<Vec<FoodItem>>,
    },
    Status {
        resp: oneshot::Sender<QueueStatus>,
    },
    Login {
        email: String,
        password: String,
        resp: oneshot::Sender<Result<User, RuntimeError>>,
    },
    Register {
        username: String,
        email: String,
        password: String,
        resp: oneshot::Sender<Result<User, RuntimeError>>,
    },
    Logout {
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    SelectCity {
        city: String,
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    CurrentUser {
        resp: oneshot::Sender<Option<User>>,
    },
    Matches {
        resp: oneshot::Sender<Result<Vec<UserMatch>, RuntimeError>>,
    },
    AcceptMatch {
        id: String,
        resp: oneshot::Sender<Result<UserMatch, RuntimeError>>,
    },
    RejectMatch {
        id: String,
        resp: oneshot::Sender<Result<UserMatch, RuntimeError>>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Moves `session` onto a single-writer task and returns a handle to it.
///
/// Commands run one at a time in arrival order, so a save or skip sent
/// while a fetch is sleeping waits for that fetch to settle.
pub fn spawn_session(
    session: Session,
    source: Box<dyn CatalogSource>,
    config: RuntimeConfig,
) -> SessionHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound.max(1));
    let (events_tx, _) = broadcast::channel::<SessionEvent>(config.event_capacity.max(1));

    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut session = session;
        let mut source = source;

        if config.fetch_on_start {
            if let Err(err) = run_fetch(&mut session, source.as_mut(), &events_tx_loop, &config).await {
                warn!(?err, "initial fetch failed");
            }
        }

        while let Some(cmd) = cmd_rx.recv().await {
            let done = handle_command(cmd, &mut session, source.as_mut(), &events_tx_loop, &config).await;
            if done {
                break;
            }
        }
        debug!("session loop stopped");
    });

    SessionHandle { cmd_tx, events_tx }
}

impl SessionHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events_tx.subscribe()
    }

    async fn request<T>(&self, cmd: Command, rx: oneshot::Receiver<T>) -> Result<T, RuntimeError> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    pub async fn fetch(&self) -> Result<usize, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.request(Command::Fetch { resp: tx }, rx).await?
    }

    /// Saves `item` and returns the catalog copy that was stored.
    pub async fn save(&self, item: FoodItem) -> Result<FoodItem, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.request(Command::Save { item, resp: tx }, rx).await?
    }

    /// Skips the current item and returns it.
    pub async fn skip(&self) -> Result<Option<FoodItem>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.request(Command::Skip { resp: tx }, rx).await?
    }

    pub async fn remove(&self, id: impl Into<ItemId>) -> Result<Option<FoodItem>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.request(Command::Remove { id: id.into(), resp: tx }, rx).await?
    }

    /// Applies a swipe decision to the current item.
    pub async fn decide(&self, decision: Decision) -> Result<Option<Applied>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.request(Command::Decide { decision, resp: tx }, rx).await?
    }

    pub async fn current(&self) -> Result<Option<FoodItem>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.request(Command::Current { resp: tx }, rx).await
    }

    pub async fn saved(&self) -> Result<Vec<FoodItem>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.request(Command::Saved { resp: tx }, rx).await
    }

    pub async fn status(&self) -> Result<QueueStatus, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.request(Command::Status { resp: tx }, rx).await
    }

    pub async fn login(&self, email: impl Into<String>, password: impl Into<String>) -> Result<User, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        let cmd = Command::Login {
            email: email.into(),
            password: password.into(),
            resp: tx,
        };
        self.request(cmd, rx).await?
    }

    pub async fn register(
        &self,
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<User, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        let cmd = Command::Register {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            resp: tx,
        };
        self.request(cmd, rx).await?
    }

    pub async fn logout(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.request(Command::Logout { resp: tx }, rx).await?
    }

    pub async fn select_city(&self, city: impl Into<String>) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.request(Command::SelectCity { city: city.into(), resp: tx }, rx).await?
    }

    pub async fn current_user(&self) -> Result<Option<User>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.request(Command::CurrentUser { resp: tx }, rx).await
    }

    pub async fn matches(&self) -> Result<Vec<UserMatch>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.request(Command::Matches { resp: tx }, rx).await?
    }

    pub async fn accept_match(&self, id: impl Into<String>) -> Result<UserMatch, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.request(Command::AcceptMatch { id: id.into(), resp: tx }, rx).await?
    }

    pub async fn reject_match(&self, id: impl Into<String>) -> Result<UserMatch, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.request(Command::RejectMatch { id: id.into(), resp: tx }, rx).await?
    }

    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.request(Command::Shutdown { resp: tx }, rx).await
    }
}

async fn handle_command(
    cmd: Command,
    session: &mut Session,
    source: &mut dyn CatalogSource,
    events_tx: &broadcast::Sender<SessionEvent>,
    config: &RuntimeConfig,
) -> bool {
    match cmd {
        Command::Fetch { resp } => {
            let res = run_fetch(session, source, events_tx, config).await;
            let _ = resp.send(res);
        }
        Command::Save { item, resp } => {
            let res = session.save(&item).map_err(RuntimeError::from).map(|receipt| {
                announce_saved(events_tx, &receipt);
                receipt.item
            });
            let _ = resp.send(res);
        }
        Command::Skip { resp } => {
            let res = session.skip().map_err(RuntimeError::from).map(|skipped| {
                if let Some(item) = &skipped {
                    let _ = events_tx.send(SessionEvent::Skipped { id: item.id.clone() });
                }
                skipped
            });
            let _ = resp.send(res);
        }
        Command::Remove { id, resp } => {
            let res = session.remove(&id).map_err(RuntimeError::from).map(|removed| {
                if removed.is_some() {
                    let _ = events_tx.send(SessionEvent::Removed { id: id.clone() });
                    let _ = events_tx.send(SessionEvent::Notice(Notice::removed()));
                }
                removed
            });
            let _ = resp.send(res);
        }
        Command::Decide { decision, resp } => {
            let res = session
                .apply_decision(decision)
                .map_err(RuntimeError::from)
                .map(|applied| {
                    match &applied {
                        Some(Applied::Saved(receipt)) => announce_saved(events_tx, receipt),
                        Some(Applied::Skipped(item)) => {
                            let _ = events_tx.send(SessionEvent::Skipped { id: item.id.clone() });
                        }
                        None => {}
                    }
                    applied
                });
            let _ = resp.send(res);
        }
        Command::Current { resp } => {
            let _ = resp.send(session.current().cloned());
        }
        Command::Saved { resp } => {
            let _ = resp.send(session.saved().to_vec());
        }
        Command::Status { resp } => {
            let _ = resp.send(session.status());
        }
        Command::Login {
            email,
            password,
            resp,
        } => {
            simulate_latency(config.auth_latency_ms).await;
            let res = match session.login(&email, &password) {
                Ok(user) => {
                    let _ = events_tx.send(SessionEvent::LoggedIn {
                        username: user.username.clone(),
                    });
                    let _ = events_tx.send(SessionEvent::Notice(Notice::logged_in(&user)));
                    Ok(user)
                }
                Err(err) => {
                    let _ = events_tx.send(SessionEvent::AuthFailed);
                    let _ = events_tx.send(SessionEvent::Notice(Notice::login_failed(&err)));
                    Err(RuntimeError::from(err))
                }
            };
            let _ = resp.send(res);
        }
        Command::Register {
            username,
            email,
            password,
            resp,
        } => {
            simulate_latency(config.auth_latency_ms).await;
            let res = match session.register(&username, &email, &password) {
                Ok(user) => {
                    let _ = events_tx.send(SessionEvent::Registered {
                        username: user.username.clone(),
                    });
                    let _ = events_tx.send(SessionEvent::Notice(Notice::registered(&user)));
                    Ok(user)
                }
                Err(err) => {
                    let _ = events_tx.send(SessionEvent::AuthFailed);
                    let _ = events_tx.send(SessionEvent::Notice(Notice::registration_failed(&err)));
                    Err(RuntimeError::from(err))
                }
            };
            let _ = resp.send(res);
        }
        Command::Logout { resp } => {
            let res = session.logout().map_err(RuntimeError::from).map(|()| {
                let _ = events_tx.send(SessionEvent::LoggedOut);
                let _ = events_tx.send(SessionEvent::Notice(Notice::logged_out()));
            });
            let _ = resp.send(res);
        }
        Command::SelectCity { city, resp } => {
            let res = session.select_city(&city).map_err(RuntimeError::from).map(|()| {
                let _ = events_tx.send(SessionEvent::CitySelected { city: city.clone() });
            });
            let _ = resp.send(res);
        }
        Command::CurrentUser { resp } => {
            let _ = resp.send(session.auth().user().cloned());
        }
        Command::Matches { resp } => {
            let _ = resp.send(session.matches().map_err(RuntimeError::from));
        }
        Command::AcceptMatch { id, resp } => {
            let _ = resp.send(session.accept_match(&id).map_err(RuntimeError::from));
        }
        Command::RejectMatch { id, resp } => {
            let _ = resp.send(session.reject_match(&id).map_err(RuntimeError::from));
        }
        Command::Shutdown { resp } => {
            let _ = resp.send(());
            return true;
        }
    }

    false
}

async fn run_fetch(
    session: &mut Session,
    source: &mut dyn CatalogSource,
    events_tx: &broadcast::Sender<SessionEvent>,
    config: &RuntimeConfig,
) -> Result<usize, RuntimeError> {
    session.begin_fetch()?;
    let _ = events_tx.send(SessionEvent::FetchStarted);

    simulate_latency(config.fetch_latency_ms).await;

    let loaded = source.load();
    match session.finish_fetch(loaded) {
        Ok(unseen) => {
            let _ = events_tx.send(SessionEvent::Fetched { unseen });
            Ok(unseen)
        }
        Err(err) => {
            let _ = events_tx.send(SessionEvent::FetchFailed);
            let _ = events_tx.send(SessionEvent::Notice(Notice::fetch_failed(&err)));
            Err(RuntimeError::from(QueueError::Fetch(err)))
        }
    }
}

/// A save swallowed by the duplicate policy changed nothing; it gets a notice only.
fn announce_saved(events_tx: &broadcast::Sender<SessionEvent>, receipt: &SaveReceipt) {
    if !receipt.appended {
        let _ = events_tx.send(SessionEvent::Notice(Notice::already_saved(&receipt.item)));
        return;
    }
    let _ = events_tx.send(SessionEvent::Saved {
        id: receipt.item.id.clone(),
    });
    let _ = events_tx.send(SessionEvent::Notice(Notice::saved(&receipt.item)));
}

async fn simulate_latency(ms: u64) {
    if ms > 0 {
        sleep(Duration::from_millis(ms)).await;
    }
}
