use crate::host::Elevator;
use crate::shared::{Direction, ElevatorEvent, ElevatorEventKind, FloorNum};
use log::{trace, warn};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

const FLOOR_EPSILON: f64 = 1e-9;

/**
 * A car in the scripted host.
 *
 * Travel is a constant speed between floors, no acceleration and no passengers. Events are only
 * recorded in `outbox` for kinds the controller subscribed to; `Simulation` drains and delivers them.
 *
 * # Fields
 * - `index`:               Position in the host's elevator list.
 * - `n_floors`:            Floors in the building, used to clamp requests.
 * - `position`:            Exact height in floors. Fractional while travelling.
 * - `current_floor`:       Floor the car is at or last passed.
 * - `heading`:             Direction of the current or last leg.
 * - `destination_queue`:   Floors to visit, front first.
 * - `target`:              Floor the car is committed to, taken from the front of the queue.
 * - `announced`:           Floor a `passing_floor` event was raised for on this leg.
 * - `door_timer`:          Simulated seconds until the doors close. Zero when closed.
 * - `pressed_floors`:      Lit cab buttons.
 * - `subscriptions`:       Event kinds the controller registered with `on`.
 */
#[derive(Debug, Clone)]
pub struct SimElevator {
    index: usize,
    n_floors: FloorNum,
    max_passenger_count: u32,
    position: f64,
    current_floor: FloorNum,
    heading: Direction,
    destination_queue: Vec<FloorNum>,
    target: Option<FloorNum>,
    announced: Option<FloorNum>,
    door_timer: f64,
    going_up: bool,
    going_down: bool,
    load_factor: f64,
    pressed_floors: BTreeSet<FloorNum>,
    subscriptions: HashSet<ElevatorEventKind>,
    outbox: Vec<ElevatorEvent>,
}

/// Outcome of one `advance` call that the host has to react to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Movement {
    Resting,
    Travelling,
    Arrived(FloorNum),
    Halted(FloorNum),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ElevatorSnapshot {
    pub index: usize,
    pub position: f64,
    pub current_floor: FloorNum,
    pub direction: Direction,
    pub destination_queue: Vec<FloorNum>,
    pub going_up_indicator: bool,
    pub going_down_indicator: bool,
    pub load_factor: f64,
    pub pressed_floors: Vec<FloorNum>,
    pub doors_open: bool,
}

impl SimElevator {
    pub fn new(index: usize, n_floors: FloorNum, max_passenger_count: u32) -> SimElevator {
        SimElevator {
            index,
            n_floors,
            max_passenger_count,
            position: 0.0,
            current_floor: 0,
            heading: Direction::Stopped,
            destination_queue: Vec::new(),
            target: None,
            announced: None,
            door_timer: 0.0,
            going_up: true,
            going_down: true,
            load_factor: 0.0,
            pressed_floors: BTreeSet::new(),
            subscriptions: HashSet::new(),
            outbox: Vec::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn doors_open(&self) -> bool {
        self.door_timer > 0.0
    }

    pub fn is_between_floors(&self) -> bool {
        (self.position - self.position.round()).abs() > FLOOR_EPSILON
    }

    pub fn is_subscribed(&self, event: ElevatorEventKind) -> bool {
        self.subscriptions.contains(&event)
    }

    pub fn set_load_factor(&mut self, load_factor: f64) {
        if !(0.0..=1.0).contains(&load_factor) {
            warn!("Load factor {} for elevator {} clamped into [0, 1]", load_factor, self.index);
        }
        self.load_factor = if load_factor.is_nan() { 0.0 } else { load_factor.clamp(0.0, 1.0) };
    }

    /// A passenger inside the car pressed `floor_num`.
    pub fn press_floor_button(&mut self, floor_num: FloorNum) {
        let floor_num = self.clamp_floor(floor_num);
        self.pressed_floors.insert(floor_num);
        self.emit(ElevatorEvent::FloorButtonPressed(floor_num));
    }

    pub fn take_events(&mut self) -> Vec<ElevatorEvent> {
        std::mem::take(&mut self.outbox)
    }

    pub fn snapshot(&self) -> ElevatorSnapshot {
        ElevatorSnapshot {
            index: self.index,
            position: self.position,
            current_floor: self.current_floor,
            direction: self.destination_direction(),
            destination_queue: self.destination_queue.clone(),
            going_up_indicator: self.going_up,
            going_down_indicator: self.going_down,
            load_factor: self.load_factor,
            pressed_floors: self.get_pressed_floors(),
            doors_open: self.doors_open(),
        }
    }

    /**
     * Moves the car by `dt` simulated seconds at `speed` floors per second.
     *
     * Time is spent on door dwell and travel until it runs out. The call returns early, with the
     * unspent time, when the car arrives or halts at a floor or when it raised an event the
     * controller has to see first. A subscribed `passing_floor` is raised before the car crosses
     * that floor, so the controller can still redirect it.
     *
     * # Returns
     * The movement that ended the call and the simulated seconds left to spend.
     */
    pub fn advance(&mut self, dt: f64, speed: f64, door_open_time: f64) -> (Movement, f64) {
        let raised = self.outbox.len();
        let mut remaining = dt;

        loop {
            if self.doors_open() {
                if remaining < self.door_timer {
                    self.door_timer -= remaining;
                    return (Movement::Resting, 0.0);
                }
                remaining -= self.door_timer;
                self.door_timer = 0.0;
                self.check_destination_queue();
                if self.outbox.len() > raised {
                    return (Movement::Resting, remaining);
                }
                continue;
            }

            let goal = match (self.target, self.is_between_floors()) {
                (Some(target), _) => target,
                (None, true) => self.next_floor_in(self.heading),
                (None, false) => return (Movement::Resting, 0.0),
            };

            if (goal as f64 - self.position).abs() <= FLOOR_EPSILON {
                return (self.reach(goal, door_open_time), remaining);
            }

            let heading = Direction::between(self.position, goal as f64);
            if heading != self.heading {
                self.announced = None;
            }
            self.heading = heading;

            let next = self.next_floor_in(heading);
            if self.target.is_some() && next != goal && self.announced != Some(next) {
                self.announced = Some(next);
                self.emit(ElevatorEvent::PassingFloor(next, heading));
                if self.outbox.len() > raised {
                    return (Movement::Travelling, remaining);
                }
            }

            let limit = (next as f64 - self.position).abs();
            let travel = speed * remaining;
            if travel < limit {
                let sign = if heading == Direction::Up { 1.0 } else { -1.0 };
                self.position += sign * travel;
                return (Movement::Travelling, 0.0);
            }

            remaining = (remaining - limit / speed).max(0.0);
            self.position = next as f64;
            self.current_floor = next;
            if next == goal {
                return (self.reach(next, door_open_time), remaining);
            }
            trace!("Elevator {} passed floor {}", self.index, next);
        }
    }

    fn reach(&mut self, floor_num: FloorNum, door_open_time: f64) -> Movement {
        self.position = floor_num as f64;
        self.current_floor = floor_num;
        self.announced = None;

        if self.target.take() == Some(floor_num) {
            if let Some(&front) = self.destination_queue.first() {
                if self.clamp_floor(front) == floor_num {
                    self.destination_queue.remove(0);
                }
            }
            self.pressed_floors.remove(&floor_num);
            self.emit(ElevatorEvent::StoppedAtFloor(floor_num));
            self.door_timer = door_open_time;
            if !self.doors_open() {
                self.check_destination_queue();
            }
            Movement::Arrived(floor_num)
        } else {
            self.check_destination_queue();
            Movement::Halted(floor_num)
        }
    }

    fn next_floor_in(&self, heading: Direction) -> FloorNum {
        let next = match heading {
            Direction::Up => (self.position + FLOOR_EPSILON).floor() + 1.0,
            Direction::Down => (self.position - FLOOR_EPSILON).ceil() - 1.0,
            Direction::Stopped => self.position.round(),
        };
        next.clamp(0.0, self.top_floor() as f64) as FloorNum
    }

    fn top_floor(&self) -> FloorNum {
        self.n_floors.saturating_sub(1)
    }

    fn clamp_floor(&self, floor_num: FloorNum) -> FloorNum {
        if floor_num > self.top_floor() {
            warn!(
                "Floor {} out of range for elevator {}, clamped to {}",
                floor_num,
                self.index,
                self.top_floor()
            );
            self.top_floor()
        } else {
            floor_num
        }
    }

    fn emit(&mut self, event: ElevatorEvent) {
        if self.is_subscribed(event.kind()) {
            trace!("Elevator {} raised {:?}", self.index, event);
            self.outbox.push(event);
        }
    }
}

impl Elevator for SimElevator {
    fn on(&mut self, event: ElevatorEventKind) {
        self.subscriptions.insert(event);
    }

    fn go_to_floor(&mut self, floor_num: FloorNum, force: bool) {
        let floor_num = self.clamp_floor(floor_num);

        let adjacent = if force {
            self.destination_queue.first()
        } else {
            self.destination_queue.last()
        };
        if adjacent == Some(&floor_num) {
            return;
        }

        if force {
            self.destination_queue.insert(0, floor_num);
        } else {
            self.destination_queue.push(floor_num);
        }
        self.check_destination_queue();
    }

    fn stop(&mut self) {
        self.destination_queue.clear();
        self.target = None;
        self.announced = None;
        if !self.is_between_floors() {
            self.check_destination_queue();
        }
    }

    fn current_floor(&self) -> FloorNum {
        self.current_floor
    }

    fn going_up_indicator(&self) -> bool {
        self.going_up
    }

    fn set_going_up_indicator(&mut self, value: bool) {
        self.going_up = value;
    }

    fn going_down_indicator(&self) -> bool {
        self.going_down
    }

    fn set_going_down_indicator(&mut self, value: bool) {
        self.going_down = value;
    }

    fn max_passenger_count(&self) -> u32 {
        self.max_passenger_count
    }

    fn load_factor(&self) -> f64 {
        self.load_factor
    }

    fn destination_direction(&self) -> Direction {
        match self.destination_queue.first() {
            Some(&front) => Direction::between(self.position, front as f64),
            None => Direction::Stopped,
        }
    }

    fn destination_queue(&self) -> &[FloorNum] {
        &self.destination_queue
    }

    fn destination_queue_mut(&mut self) -> &mut Vec<FloorNum> {
        &mut self.destination_queue
    }

    fn check_destination_queue(&mut self) {
        if self.doors_open() {
            return;
        }

        match self.destination_queue.first() {
            Some(&front) => {
                let front = self.clamp_floor(front);
                if self.target != Some(front) {
                    self.announced = None;
                }
                self.target = Some(front);
            }
            None => {
                self.target = None;
                if !self.is_between_floors() {
                    self.emit(ElevatorEvent::Idle);
                }
            }
        }
    }

    fn get_pressed_floors(&self) -> Vec<FloorNum> {
        self.pressed_floors.iter().copied().collect()
    }
}
