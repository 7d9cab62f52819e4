//! Core of the photo scavenger hunt: the task store, the per-source
//! location resolver and the boundaries they talk to.

pub mod error;
pub mod events;
pub mod location;
pub mod metadata;
pub mod model;
pub mod resolver;
pub mod service;
pub mod store;
pub mod upload;

pub use error::HuntError;
pub use events::{TaskChange, TaskEvent};
pub use location::{DeviceLocationFeed, LocationProvider, LocationWatch};
pub use metadata::photo_location;
pub use model::geo::GeoCoordinate;
pub use model::photo::{Photo, PhotoSource};
pub use model::task::{Submission, Task, TaskId, TaskState};
pub use resolver::LocationResolver;
pub use service::dto::TaskDto;
pub use service::hunt_service::HuntService;
pub use store::Hunt;
pub use upload::{
    SimulatedUploadTransport, UploadError, UploadTransport, SIMULATED_UPLOAD_DELAY,
};
