//! Live camera capture for the detection client.
//!
//! A device worker runs on tokio's blocking pool and publishes the most
//! recent frame into a single slot, which readers sample whenever they like.

mod error;
pub use error::*;

mod videoframe;
pub use videoframe::*;

pub mod videoin;
pub use videoin::*;
