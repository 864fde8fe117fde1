// author: kodeholic (powered by Claude)

pub mod message;
pub mod opcode;

pub use message::{classify, ClientCommand, Frame, ServerEvent};
