pub mod geo;
pub mod photo;
pub mod task;

// Re-export
pub use geo::GeoCoordinate;
pub use photo::{Photo, PhotoSource};
pub use task::{Submission, Task, TaskId, TaskState};
