//! Room WebSocket client using tokio-tungstenite

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio_tungstenite::{connect_async, tungstenite::Message};

use dicetable_protocol::{ClientMessage, ServerMessage};

use super::shared::{parse_server_frame, RECONNECT_DELAY_MS};
use super::ConnectionState;

type FrameCallback = Box<dyn Fn(ServerMessage) + Send + Sync>;
type StateCallback = Box<dyn Fn(ConnectionState) + Send + Sync>;

/// WebSocket client for one room endpoint.
///
/// Connectivity is treated as eventually-consistent: a failed or dropped
/// connection re-attempts with the same room and nickname after a fixed
/// delay, indefinitely, until a manual disconnect. Callers never see a
/// per-attempt error.
pub struct RoomClient {
    endpoint: String,
    nickname: String,
    state: Arc<RwLock<ConnectionState>>,
    tx: Arc<Mutex<Option<mpsc::Sender<ClientMessage>>>>,
    on_frame: Arc<Mutex<Option<FrameCallback>>>,
    on_state_change: Arc<Mutex<Option<StateCallback>>>,
    /// Flag to track if disconnect was intentional (vs unexpected close)
    manual_disconnect: Arc<RwLock<bool>>,
}

impl RoomClient {
    pub fn new(endpoint: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            nickname: nickname.into(),
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
            tx: Arc::new(Mutex::new(None)),
            on_frame: Arc::new(Mutex::new(None)),
            on_state_change: Arc::new(Mutex::new(None)),
            manual_disconnect: Arc::new(RwLock::new(false)),
        }
    }

    pub async fn set_on_frame<F>(&self, callback: F)
    where
        F: Fn(ServerMessage) + Send + Sync + 'static,
    {
        let mut on_frame = self.on_frame.lock().await;
        *on_frame = Some(Box::new(callback));
    }

    pub async fn set_on_state_change<F>(&self, callback: F)
    where
        F: Fn(ConnectionState) + Send + Sync + 'static,
    {
        let mut on_state_change = self.on_state_change.lock().await;
        *on_state_change = Some(Box::new(callback));
    }

    pub async fn state(&self) -> ConnectionState {
        *self.state.read().await
    }

    async fn set_state(&self, new_state: ConnectionState) {
        {
            let mut state = self.state.write().await;
            *state = new_state;
        }

        let callback = self.on_state_change.lock().await;
        if let Some(ref cb) = *callback {
            cb(new_state);
        }
    }

    /// Internal connect logic - returns whether the connection closed
    /// unexpectedly (vs a manual disconnect).
    async fn connect_once(&self) -> Result<bool> {
        self.set_state(ConnectionState::Connecting).await;

        match connect_async(&self.endpoint).await {
            Ok((ws_stream, _)) => {
                tracing::info!("Connected to room at {}", self.endpoint);
                self.set_state(ConnectionState::Connected).await;

                let (mut write, mut read) = ws_stream.split();

                let (tx, mut rx) = mpsc::channel::<ClientMessage>(32);
                // The join command authenticates the link before anything
                // else is allowed to flow.
                tx.send(ClientMessage::Join {
                    nickname: self.nickname.clone(),
                })
                .await?;
                {
                    let mut tx_lock = self.tx.lock().await;
                    *tx_lock = Some(tx);
                }

                let on_frame = Arc::clone(&self.on_frame);
                let manual_disconnect = Arc::clone(&self.manual_disconnect);

                let read_handle = tokio::spawn(async move {
                    let mut unexpected_close = false;
                    while let Some(msg) = read.next().await {
                        match msg {
                            Ok(Message::Text(text)) => match parse_server_frame(&text) {
                                Ok(frame) => {
                                    let callback = on_frame.lock().await;
                                    if let Some(ref cb) = *callback {
                                        cb(frame);
                                    }
                                }
                                Err(e) => {
                                    tracing::warn!("Failed to parse room frame: {}", e);
                                }
                            },
                            Ok(Message::Close(_)) => {
                                tracing::info!("Room closed connection");
                                let manual = *manual_disconnect.read().await;
                                unexpected_close = !manual;
                                break;
                            }
                            Ok(Message::Ping(_data)) => {}
                            Err(e) => {
                                tracing::error!("WebSocket error: {}", e);
                                unexpected_close = true;
                                break;
                            }
                            _ => {}
                        }
                    }
                    unexpected_close
                });

                let write_handle = tokio::spawn(async move {
                    while let Some(msg) = rx.recv().await {
                        let json = match serde_json::to_string(&msg) {
                            Ok(j) => j,
                            Err(e) => {
                                tracing::error!("Failed to serialize frame: {}", e);
                                continue;
                            }
                        };
                        if let Err(e) = write.send(Message::Text(json)).await {
                            tracing::error!("Failed to send frame: {}", e);
                            break;
                        }
                    }
                    // Sender gone: announce the close so the peer (and our
                    // read half) can tear down instead of waiting it out.
                    let _ = write.send(Message::Close(None)).await;
                });

                let unexpected_close = tokio::select! {
                    result = read_handle => result.unwrap_or(true),
                    _ = write_handle => {
                        // Write task ended first - sender dropped on manual
                        // disconnect, or the sink failed.
                        !*self.manual_disconnect.read().await
                    }
                };

                {
                    let mut tx_lock = self.tx.lock().await;
                    *tx_lock = None;
                }

                Ok(unexpected_close)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to room: {}", e);
                Err(e.into())
            }
        }
    }

    /// Connect and hold the link until a manual disconnect.
    ///
    /// Any non-manual close (including a refused connect) schedules a
    /// re-attempt after [`RECONNECT_DELAY_MS`] with the same room and
    /// nickname. A manual disconnect set before the timer fires suppresses
    /// the retry; the suppression lasts until the next explicit `run`.
    pub async fn run(&self) {
        {
            let mut flag = self.manual_disconnect.write().await;
            *flag = false;
        }

        loop {
            let retry = match self.connect_once().await {
                Ok(unexpected_close) => unexpected_close,
                Err(_) => true,
            };
            if !retry || *self.manual_disconnect.read().await {
                break;
            }

            self.set_state(ConnectionState::Reconnecting).await;
            tracing::info!("Link dropped, retrying in {}ms", RECONNECT_DELAY_MS);
            tokio::time::sleep(Duration::from_millis(RECONNECT_DELAY_MS)).await;

            if *self.manual_disconnect.read().await {
                break;
            }
        }

        self.set_state(ConnectionState::Disconnected).await;
    }

    pub async fn send(&self, message: ClientMessage) -> Result<()> {
        // Clone the sender to avoid holding the lock across await
        let tx = {
            let tx_lock = self.tx.lock().await;
            tx_lock.clone()
        };
        if let Some(tx) = tx {
            tx.send(message).await?;
            Ok(())
        } else {
            Err(anyhow::anyhow!("Not connected"))
        }
    }

    /// Mark the disconnect as manual, then close. Distinguishes "user
    /// left" from "link dropped" for the reconnection policy.
    pub async fn disconnect(&self) {
        {
            let mut flag = self.manual_disconnect.write().await;
            *flag = true;
        }
        {
            let mut tx_lock = self.tx.lock().await;
            *tx_lock = None;
        }
        self.set_state(ConnectionState::Disconnected).await;
    }
}

impl Clone for RoomClient {
    fn clone(&self) -> Self {
        Self {
            endpoint: self.endpoint.clone(),
            nickname: self.nickname.clone(),
            state: Arc::clone(&self.state),
            tx: Arc::clone(&self.tx),
            on_frame: Arc::clone(&self.on_frame),
            on_state_change: Arc::clone(&self.on_state_change),
            manual_disconnect: Arc::clone(&self.manual_disconnect),
        }
    }
}
