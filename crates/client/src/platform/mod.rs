//! Desktop implementations of the outbound ports.

mod desktop;

pub use desktop::{ConsolePresentation, PreferenceStore};
