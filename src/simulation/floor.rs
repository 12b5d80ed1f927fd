use crate::host::Floor;
use crate::shared::{FloorEvent, FloorNum};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct SimFloor {
    floor_num: FloorNum,
    up_pressed: bool,
    down_pressed: bool,
    subscriptions: HashSet<FloorEvent>,
    outbox: Vec<FloorEvent>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FloorSnapshot {
    pub floor_num: FloorNum,
    pub up_button: bool,
    pub down_button: bool,
}

impl SimFloor {
    pub fn new(floor_num: FloorNum) -> SimFloor {
        SimFloor {
            floor_num,
            up_pressed: false,
            down_pressed: false,
            subscriptions: HashSet::new(),
            outbox: Vec::new(),
        }
    }

    /// Passengers press again after failing to board, so every press raises the event.
    pub fn press(&mut self, event: FloorEvent) {
        match event {
            FloorEvent::UpButtonPressed => self.up_pressed = true,
            FloorEvent::DownButtonPressed => self.down_pressed = true,
        }
        if self.subscriptions.contains(&event) {
            self.outbox.push(event);
        }
    }

    /// A car stopped here with the given indicators lit.
    pub fn serve(&mut self, going_up: bool, going_down: bool) {
        if going_up {
            self.up_pressed = false;
        }
        if going_down {
            self.down_pressed = false;
        }
    }

    pub fn up_pressed(&self) -> bool {
        self.up_pressed
    }

    pub fn down_pressed(&self) -> bool {
        self.down_pressed
    }

    pub fn take_events(&mut self) -> Vec<FloorEvent> {
        std::mem::take(&mut self.outbox)
    }

    pub fn snapshot(&self) -> FloorSnapshot {
        FloorSnapshot {
            floor_num: self.floor_num,
            up_button: self.up_pressed,
            down_button: self.down_pressed,
        }
    }
}

impl Floor for SimFloor {
    fn floor_num(&self) -> FloorNum {
        self.floor_num
    }

    fn on(&mut self, event: FloorEvent) {
        self.subscriptions.insert(event);
    }
}
