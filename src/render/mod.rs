//! Terminal presentation; consumes [`crate::game::Snapshot`] values only

pub mod renderer;

pub use renderer::Renderer;
