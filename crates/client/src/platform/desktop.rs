//! Desktop platform implementations
//!
//! File-backed preference persistence and a console renderer for the
//! presentation port.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use directories::ProjectDirs;

use crate::ports::{NicknameStore, Presentation};
use crate::session::rolls::RollOutcome;
use crate::session::roster::SeatedPlayer;

const NICKNAME_KEY: &str = "dice_table_nickname";
const MUTED_KEY: &str = "dice_table_muted";

/// Key-value preference store with file-based persistence
///
/// Stores pairs in a JSON file at:
/// - Linux: ~/.config/dicetable/client/storage.json
/// - macOS: ~/Library/Application Support/io.dicetable.client/storage.json
/// - Windows: C:\Users\<User>\AppData\Roaming\dicetable\client\storage.json
#[derive(Clone)]
pub struct PreferenceStore {
    storage_path: PathBuf,
    cache: Arc<RwLock<HashMap<String, String>>>,
}

impl Default for PreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore {
    /// Load the store from the platform config directory.
    pub fn new() -> Self {
        let storage_path = if let Some(dirs) = ProjectDirs::from("io", "dicetable", "client") {
            dirs.config_dir().join("storage.json")
        } else {
            PathBuf::from("dicetable_storage.json")
        };
        Self::at_path(storage_path)
    }

    /// Load the store from an explicit path.
    pub fn at_path(storage_path: PathBuf) -> Self {
        let cache = if storage_path.exists() {
            match fs::read_to_string(&storage_path) {
                Ok(data) => match serde_json::from_str::<HashMap<String, String>>(&data) {
                    Ok(map) => map,
                    Err(e) => {
                        tracing::warn!("Failed to parse storage file: {}", e);
                        HashMap::new()
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read storage file: {}", e);
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };

        tracing::debug!("Preference store at: {:?}", storage_path);

        Self {
            storage_path,
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    pub fn save(&self, key: &str, value: &str) {
        match self.cache.write() {
            Ok(mut guard) => {
                guard.insert(key.to_string(), value.to_string());
                drop(guard); // Release lock before I/O
                self.persist();
            }
            Err(e) => {
                tracing::error!("Failed to acquire write lock for storage: {}", e);
            }
        }
    }

    pub fn load(&self, key: &str) -> Option<String> {
        match self.cache.read() {
            Ok(guard) => guard.get(key).cloned(),
            Err(e) => {
                tracing::error!("Failed to acquire read lock for storage: {}", e);
                None
            }
        }
    }

    pub fn remove(&self, key: &str) {
        match self.cache.write() {
            Ok(mut guard) => {
                guard.remove(key);
                drop(guard); // Release lock before I/O
                self.persist();
            }
            Err(e) => {
                tracing::error!("Failed to acquire write lock for storage: {}", e);
            }
        }
    }

    pub fn muted(&self) -> bool {
        self.load(MUTED_KEY).as_deref() == Some("true")
    }

    pub fn set_muted(&self, muted: bool) {
        self.save(MUTED_KEY, if muted { "true" } else { "false" });
    }

    fn persist(&self) {
        if let Some(parent) = self.storage_path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::error!("Failed to create storage directory: {}", e);
                return;
            }
        }

        let cache = match self.cache.read() {
            Ok(guard) => guard,
            Err(e) => {
                tracing::error!("Failed to acquire read lock for storage: {}", e);
                return;
            }
        };

        match serde_json::to_string_pretty(&*cache) {
            Ok(data) => {
                if let Err(e) = fs::write(&self.storage_path, data) {
                    tracing::error!("Failed to write storage file: {}", e);
                }
            }
            Err(e) => {
                tracing::error!("Failed to serialize storage data: {}", e);
            }
        }
    }
}

impl NicknameStore for PreferenceStore {
    fn get_saved_name(&self) -> Option<String> {
        self.load(NICKNAME_KEY).filter(|name| !name.trim().is_empty())
    }

    fn save_name(&self, name: &str) {
        self.save(NICKNAME_KEY, name);
    }

    fn clear_name(&self) {
        self.remove(NICKNAME_KEY);
    }
}

/// Console renderer for the presentation port.
///
/// The real table UI animates dice; the console prints the same events in
/// arrival order, which is all the session core requires of a renderer.
pub struct ConsolePresentation {
    muted: AtomicBool,
}

impl ConsolePresentation {
    pub fn new(muted: bool) -> Self {
        Self {
            muted: AtomicBool::new(muted),
        }
    }

    pub fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::Relaxed);
    }
}

impl Presentation for ConsolePresentation {
    fn render_seats(&self, seats: &[SeatedPlayer], local_name: &str, current_holder: &str) {
        println!("--- table ---");
        for seated in seats {
            let me = if seated.name == local_name { " (you)" } else { "" };
            let turn = if seated.name == current_holder {
                " <- turn"
            } else {
                ""
            };
            println!("  seat {:>2}: {}{}{}", seated.seat, seated.name, me, turn);
        }
    }

    fn render_roll_pending(&self, initiator: &str, quantity: u32) {
        println!("{} is rolling {} dice...", initiator, quantity);
    }

    fn render_roll_result(&self, outcome: &RollOutcome) {
        let rolls: Vec<String> = outcome.rolls.iter().map(|r| r.to_string()).collect();
        let bell = if self.muted.load(Ordering::Relaxed) {
            ""
        } else {
            "\x07"
        };
        println!(
            "{}[{}] rolled {}: {} = {}",
            bell,
            outcome.nickname,
            outcome.notation,
            rolls.join(" + "),
            outcome.total
        );
    }

    fn render_system_notice(&self, text: &str) {
        println!("* {}", text);
    }
}
