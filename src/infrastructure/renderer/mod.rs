//! Renderer adapters

pub mod console;
pub mod null;

pub use console::ConsoleRenderer;
pub use null::NullRenderer;
