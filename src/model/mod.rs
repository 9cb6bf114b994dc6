pub mod de;
mod event;
mod session;
mod store;

pub use event::{EventKind, LogonType, SessionEvent, privilege_lines};
pub use session::{Session, SessionStatus};
pub use store::Dataset;
