// Gtmacro Event Sources
// Input polling with explicit edge tracking

pub mod edge;
pub mod poll;

pub use edge::EdgeDetector;
pub use poll::{PollBinding, PollHandle, PollLoop, PollSampler, DEFAULT_POLL_INTERVAL};
