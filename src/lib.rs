// author: kodeholic (powered by Claude)

pub mod client;
pub mod config;
pub mod console;
pub mod error;
pub mod protocol;
pub mod store;
pub mod transport;

pub use console::run_console;

/// CLI에서 주입되는 런타임 설정
/// - 기본값은 config.rs 상수
pub struct ConsoleArgs {
    pub url: String,
}
