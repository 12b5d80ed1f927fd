pub mod solution;

pub use solution::SolutionController;
pub use solution::IDLE_ROUTE;
