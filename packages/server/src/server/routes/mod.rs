// HTTP routes
pub mod health;
pub mod stories;

pub use health::*;
pub use stories::*;
