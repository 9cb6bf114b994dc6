pub mod layout;
pub mod pairing;
pub mod session_detail;
pub mod timeline_filter;

pub use pairing::{SessionPair, SessionPairs, SessionSort, SortKey, pair_sessions};
pub use session_detail::SessionDetail;
pub use timeline_filter::standard_timeline;
