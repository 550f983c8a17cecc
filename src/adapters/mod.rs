// Adapters layer: concrete collaborators for the command line build
// (file-backed storage and cookies, console notifications and reloads).

pub mod platform;
pub mod storage;

pub use platform::{ConsoleTabs, FileCookieJar, TracingNotifier, UnsupportedDecryptor};
pub use storage::JsonPreferenceStore;
