pub mod elevator;
pub mod floor;
pub mod runner;
pub mod world;
pub mod world_tests;

pub use elevator::{ElevatorSnapshot, SimElevator};
pub use floor::{FloorSnapshot, SimFloor};
pub use runner::SimulationRunner;
pub use world::{Simulation, WorldSnapshot};
