// author: kodeholic (powered by Gemini)

use std::fmt;

#[derive(Debug)]
pub enum StoreError {
    ConnectFailed(String),
    NotConnected,
    SendFailed(String),
    MessageTooLong(usize),
    Transport(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::ConnectFailed(reason) => write!(f, "Failed to connect: {}", reason),
            StoreError::NotConnected => write!(f, "Not connected to a server"),
            StoreError::SendFailed(reason) => write!(f, "Failed to send frame: {}", reason),
            StoreError::MessageTooLong(len) => write!(f, "Message too long: {} bytes", len),
            StoreError::Transport(reason) => write!(f, "Transport error: {}", reason),
        }
    }
}

impl std::error::Error for StoreError {}

pub type StoreResult<T> = Result<T, StoreError>;
