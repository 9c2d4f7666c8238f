//! State module for tracking crawl progress
//!
//! - `TaskState`: lifecycle of one league crawl unit
//!   (pending, admitted, fetching, assembled/skipped/failed, released)

mod task_state;

pub use task_state::TaskState;
