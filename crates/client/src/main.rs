//! Dice Table - terminal composition root.
//!
//! Wires the session controller to the room WebSocket client (or to the
//! solo simulation path when no room is wanted) and drives both from a
//! single input channel: inbound frames, connection state changes and
//! stdin commands all funnel through one event loop, so all session state
//! mutates on one task.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use rand::Rng;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dicetable_client::net::{room_endpoint, ConnectionState, RoomClient};
use dicetable_client::platform::{ConsolePresentation, PreferenceStore};
use dicetable_client::ports::{NicknameStore, Presentation};
use dicetable_client::session::rolls::SOLO_RESOLVE_DELAY_MS;
use dicetable_client::session::{RollCommand, SessionController};
use dicetable_protocol::{
    DiceRequest, RoomCode, ServerMessage, ROOM_CODE_ALPHABET, ROOM_CODE_LEN,
};

const DEFAULT_SERVER_URL: &str = "ws://localhost:8000";

/// Everything the event loop reacts to.
enum Input {
    Frame(ServerMessage),
    Connection(ConnectionState),
    Line(String),
    Eof,
}

#[derive(Debug, Clone, Default)]
struct Config {
    server_url: Option<String>,
    room: Option<String>,
    nickname: Option<String>,
    solo: bool,
}

impl Config {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut config = Self {
            server_url: std::env::var("DICETABLE_SERVER_URL").ok(),
            room: std::env::var("DICETABLE_ROOM").ok(),
            nickname: std::env::var("DICETABLE_NICKNAME").ok(),
            solo: std::env::var("DICETABLE_SOLO").is_ok_and(|v| v == "1" || v == "true"),
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--solo" => config.solo = true,
                "--name" => match args.next() {
                    Some(name) => config.nickname = Some(name),
                    None => bail!("--name requires a value"),
                },
                "--server" => match args.next() {
                    Some(url) => config.server_url = Some(url),
                    None => bail!("--server requires a value"),
                },
                other if other.starts_with("--") => bail!("unknown flag: {other}"),
                room => config.room = Some(room.to_string()),
            }
        }
        Ok(config)
    }

    fn server_url(&self) -> &str {
        self.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }
}

fn generate_room_code() -> Result<RoomCode> {
    let mut rng = rand::thread_rng();
    let code: String = (0..ROOM_CODE_LEN)
        .map(|_| {
            let i = rng.gen_range(0..ROOM_CODE_ALPHABET.len());
            ROOM_CODE_ALPHABET[i] as char
        })
        .collect();
    Ok(RoomCode::new(code)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dicetable_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse(std::env::args().skip(1))?;
    let store = PreferenceStore::new();
    let presentation = Arc::new(ConsolePresentation::new(store.muted()));

    let nickname = config
        .nickname
        .clone()
        .filter(|n| !n.trim().is_empty())
        .or_else(|| store.get_saved_name());

    let (tx, rx) = mpsc::unbounded_channel::<Input>();
    spawn_stdin_reader(tx.clone());

    if config.solo {
        // Single-player fallback: no transport at all, a roster of one.
        let name = nickname.unwrap_or_else(|| "Player".to_string());
        let controller = SessionController::solo(name, presentation.clone());
        println!("Solo table. Type 'help' for commands.");
        return run_loop(controller, None, store, presentation, tx, rx).await;
    }

    // Joining with no name is rejected before any frame is sent.
    let Some(name) = nickname else {
        bail!("Enter your nickname (--name <name> or DICETABLE_NICKNAME)");
    };
    store.save_name(&name);

    let room = match &config.room {
        Some(code) => RoomCode::new(code.clone())?,
        None => {
            let code = generate_room_code()?;
            println!("Created room {} - share this code to invite players", code);
            code
        }
    };

    let endpoint = room_endpoint(config.server_url(), &room)?;
    tracing::info!("Joining room {} at {}", room, endpoint);

    let client = RoomClient::new(endpoint, name.clone());
    {
        let tx_frames = tx.clone();
        client
            .set_on_frame(move |frame| {
                let _ = tx_frames.send(Input::Frame(frame));
            })
            .await;
        let tx_state = tx.clone();
        client
            .set_on_state_change(move |state| {
                let _ = tx_state.send(Input::Connection(state));
            })
            .await;
    }
    let runner = client.clone();
    tokio::spawn(async move { runner.run().await });

    let controller = SessionController::new(name, presentation.clone());
    println!("Type 'help' for commands.");
    run_loop(controller, Some(client), store, presentation, tx, rx).await
}

fn spawn_stdin_reader(tx: mpsc::UnboundedSender<Input>) {
    tokio::spawn(async move {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(Input::Line(line)).is_err() {
                        break;
                    }
                }
                _ => {
                    let _ = tx.send(Input::Eof);
                    break;
                }
            }
        }
    });
}

async fn run_loop(
    mut controller: SessionController,
    client: Option<RoomClient>,
    store: PreferenceStore,
    presentation: Arc<ConsolePresentation>,
    tx: mpsc::UnboundedSender<Input>,
    mut rx: mpsc::UnboundedReceiver<Input>,
) -> Result<()> {
    let mut muted = store.muted();

    while let Some(input) = rx.recv().await {
        match input {
            Input::Frame(frame) => controller.handle_frame(frame),
            Input::Connection(state) => controller.handle_connection_change(state),
            Input::Eof => {
                if let Some(client) = &client {
                    client.disconnect().await;
                }
                break;
            }
            Input::Line(line) => {
                let line = line.trim();
                let (command, rest) = match line.split_once(char::is_whitespace) {
                    Some((head, tail)) => (head, tail.trim()),
                    None => (line, ""),
                };
                match command {
                    "" => {}
                    "roll" => {
                        let notation = if rest.is_empty() { "1d6" } else { rest };
                        match DiceRequest::from_notation(notation) {
                            Ok(request) => match controller.request_roll(&request) {
                                RollCommand::Send(frame) => {
                                    if let Some(client) = &client {
                                        if let Err(e) = client.send(frame).await {
                                            tracing::warn!("Could not send roll: {}", e);
                                        }
                                    }
                                }
                                RollCommand::Simulate(sim) => {
                                    controller.handle_frame(sim.started);
                                    let tx = tx.clone();
                                    tokio::spawn(async move {
                                        tokio::time::sleep(Duration::from_millis(
                                            SOLO_RESOLVE_DELAY_MS,
                                        ))
                                        .await;
                                        let _ = tx.send(Input::Frame(sim.resolved));
                                    });
                                }
                                RollCommand::Rejected => {}
                            },
                            Err(e) => presentation.render_system_notice(&e.to_string()),
                        }
                    }
                    "mode" => {
                        let turn_based = match rest {
                            "turn" => true,
                            "free" => false,
                            _ => {
                                presentation.render_system_notice("Usage: mode turn|free");
                                continue;
                            }
                        };
                        match controller.request_mode_change(turn_based) {
                            Some(frame) => {
                                if let Some(client) = &client {
                                    if let Err(e) = client.send(frame).await {
                                        tracing::warn!("Could not send mode change: {}", e);
                                    }
                                }
                            }
                            None => presentation
                                .render_system_notice("Mode is fixed in solo play"),
                        }
                    }
                    "mute" => {
                        muted = !muted;
                        store.set_muted(muted);
                        presentation.set_muted(muted);
                        presentation.render_system_notice(if muted {
                            "Sound off"
                        } else {
                            "Sound on"
                        });
                    }
                    "leave" | "quit" => {
                        if let Some(client) = &client {
                            client.disconnect().await;
                        }
                        store.clear_name();
                        break;
                    }
                    "help" => {
                        println!("Commands:");
                        println!("  roll [NdS]   roll dice, e.g. 'roll 3d6' (default 1d6)");
                        println!("  mode turn    request strict turn order");
                        println!("  mode free    request free-for-all");
                        println!("  mute         toggle the result bell");
                        println!("  leave        leave the table and forget the nickname");
                    }
                    other => {
                        presentation.render_system_notice(&format!(
                            "Unknown command '{}', try 'help'",
                            other
                        ));
                    }
                }
            }
        }
    }
    Ok(())
}
