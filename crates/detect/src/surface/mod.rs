use crate::{DetectError, LoadedResult};

/// Where loaded results end up.
pub trait Surface: Send + Sync + 'static {
    fn show(&self, result: &LoadedResult) -> Result<(), DetectError>;
}

mod file;
pub use file::*;

#[cfg(feature = "window")]
mod window;
#[cfg(feature = "window")]
pub use window::*;
