pub mod reference;
pub mod session;

pub use reference::Pattern;
pub use session::{CancelHandle, PaintSession, SessionReport};
