//! Controller for the Elevator Saga browser game, a scripted stand-in for the game's host API,
//! and the tooling that copies the controller into the game editor.

pub mod config;
pub mod controller;
pub mod extract;
pub mod host;
pub mod shared;
pub mod simulation;
