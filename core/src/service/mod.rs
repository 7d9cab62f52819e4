pub mod dto;
pub mod hunt_service;

// Re-export
pub use dto::TaskDto;
pub use hunt_service::HuntService;
