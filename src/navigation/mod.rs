mod screen;
mod start_destination;

pub use screen::*;
pub use start_destination::*;
