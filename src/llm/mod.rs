pub mod bridge;
pub mod extract;
pub mod payload;

pub use bridge::{ BridgeOutcome, OllamaBridge };
