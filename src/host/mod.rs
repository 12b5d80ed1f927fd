pub mod api;

pub use api::Controller;
pub use api::Elevator;
pub use api::Floor;
