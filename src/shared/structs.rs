/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/***************************************/
/*       Public data structures        */
/***************************************/
pub type FloorNum = u8;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Stopped,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Stopped => "stopped",
        }
    }

    /// Direction of travel from `from` toward `to`.
    pub fn between(from: f64, to: f64) -> Direction {
        if to > from {
            Direction::Up
        } else if to < from {
            Direction::Down
        } else {
            Direction::Stopped
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/**
 * Event kinds an elevator can be subscribed to with `Elevator::on`.
 *
 * - `Idle`:                The destination queue is empty and the car is resting at a floor.
 * - `FloorButtonPressed`:  A passenger inside the car pressed a floor button.
 * - `PassingFloor`:        The car is about to pass a floor that is not its destination.
 * - `StoppedAtFloor`:      The car arrived at a floor and opened its doors.
 */
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ElevatorEventKind {
    Idle,
    FloorButtonPressed,
    PassingFloor,
    StoppedAtFloor,
}

impl ElevatorEventKind {
    pub fn name(&self) -> &'static str {
        match *self {
            ElevatorEventKind::Idle => "idle",
            ElevatorEventKind::FloorButtonPressed => "floor_button_pressed",
            ElevatorEventKind::PassingFloor => "passing_floor",
            ElevatorEventKind::StoppedAtFloor => "stopped_at_floor",
        }
    }
}

impl fmt::Display for ElevatorEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElevatorEvent {
    Idle,
    FloorButtonPressed(FloorNum),
    PassingFloor(FloorNum, Direction),
    StoppedAtFloor(FloorNum),
}

impl ElevatorEvent {
    pub fn kind(&self) -> ElevatorEventKind {
        match *self {
            ElevatorEvent::Idle => ElevatorEventKind::Idle,
            ElevatorEvent::FloorButtonPressed(_) => ElevatorEventKind::FloorButtonPressed,
            ElevatorEvent::PassingFloor(_, _) => ElevatorEventKind::PassingFloor,
            ElevatorEvent::StoppedAtFloor(_) => ElevatorEventKind::StoppedAtFloor,
        }
    }
}

/// Hall call buttons. Floor events carry no payload, so the kind is the event.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FloorEvent {
    UpButtonPressed,
    DownButtonPressed,
}

impl FloorEvent {
    pub fn name(&self) -> &'static str {
        match *self {
            FloorEvent::UpButtonPressed => "up_button_pressed",
            FloorEvent::DownButtonPressed => "down_button_pressed",
        }
    }
}

impl fmt::Display for FloorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
