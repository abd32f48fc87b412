mod logging;
pub use logging::*;

mod vec2;
pub use vec2::*;

// re-export so downstream crates can use base::log::*
pub use log;
