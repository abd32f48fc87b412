//! Live camera detection client.
//!
//! A [`Session`] samples the current camera frame on a fixed interval,
//! encodes it as JPEG, posts it to a detection server and hands the
//! annotated image that comes back to a display [`Surface`].
//!
//! ```text
//! VideoIn --current()--> FrameBuffer --encode--> UploadClient --POST--> server
//!                                                                         |
//!               Surface <--show-- ResultRenderer <--annotated image-------+
//! ```

mod config;
pub use config::*;

mod error;
pub use error::*;

mod frame;
pub use frame::*;

mod render;
pub use render::*;

mod session;
pub use session::*;

mod source;
pub use source::*;

mod stats;
pub use stats::*;

mod surface;
pub use surface::*;

mod upload;
pub use upload::*;
