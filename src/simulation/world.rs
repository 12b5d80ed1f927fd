/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{debug, trace, warn};
use serde::Serialize;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::{ConfigError, SimulationConfig};
use crate::host::{Controller, Elevator};
use crate::shared::{FloorEvent, FloorNum};
use crate::simulation::elevator::{ElevatorSnapshot, Movement, SimElevator};
use crate::simulation::floor::{FloorSnapshot, SimFloor};

/// Delivery rounds per dispatch before pending events are dropped.
pub const MAX_DISPATCH_ROUNDS: usize = 64;
/// Movement passes per step before the rest of the step is dropped.
pub const MAX_MOVES_PER_STEP: usize = 1024;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct WorldSnapshot {
    pub time: f64,
    pub elevators: Vec<ElevatorSnapshot>,
    pub floors: Vec<FloorSnapshot>,
}

/**
 * Scripted stand-in for the game engine.
 *
 * Owns the cars and floors and calls into a `Controller` the way the game does: `init` once in
 * `start`, then on every `step` the cars move, raised events are delivered, and `update` runs.
 * A `Simulation` only exists after `init` has run, so nothing can reach the controller before it.
 *
 * # Fields
 * - `controller`:      The solution under test.
 * - `elevators`:       Cars, in the stable order the controller was initialised with.
 * - `floors`:          Floors, bottom first.
 * - `speed`:           Travel speed in floors per second.
 * - `door_open_time`:  Seconds the doors stay open after a stop.
 * - `clock`:           Simulated seconds since `start`.
 */
pub struct Simulation<C: Controller> {
    controller: C,
    elevators: Vec<SimElevator>,
    floors: Vec<SimFloor>,
    speed: f64,
    door_open_time: f64,
    clock: f64,
}

impl<C: Controller> Simulation<C> {
    pub fn start(config: &SimulationConfig, mut controller: C) -> Result<Simulation<C>, ConfigError> {
        config.validate()?;

        let mut elevators: Vec<SimElevator> = (0..config.n_elevators)
            .map(|index| SimElevator::new(index, config.n_floors, config.max_passenger_count))
            .collect();
        let mut floors: Vec<SimFloor> = (0..config.n_floors).map(SimFloor::new).collect();

        controller.init(&mut elevators, &mut floors);
        debug!(
            "Controller initialised with {} elevators and {} floors",
            elevators.len(),
            floors.len()
        );

        let mut simulation = Simulation {
            controller,
            elevators,
            floors,
            speed: config.floors_per_second,
            door_open_time: config.door_open_time,
            clock: 0.0,
        };

        // Every car starts resting with an empty queue
        for elevator in simulation.elevators.iter_mut() {
            elevator.check_destination_queue();
        }
        simulation.dispatch_events();
        Ok(simulation)
    }

    /// Advances the world by `dt` simulated seconds.
    pub fn step(&mut self, dt: f64) {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            warn!("Ignoring invalid time step {}", dt);
            0.0
        };
        self.clock += dt;

        // Cars stop mid-step for arrivals and raised events, so the controller sees them in time
        let mut remaining = vec![dt; self.elevators.len()];
        for pass in 0.. {
            if pass == MAX_MOVES_PER_STEP {
                warn!(
                    "Movement did not settle after {} passes at t={:.2}s, dropping the rest of the step",
                    MAX_MOVES_PER_STEP, self.clock
                );
                break;
            }

            for (elevator, left) in self.elevators.iter_mut().zip(remaining.iter_mut()) {
                let (movement, unspent) = elevator.advance(*left, self.speed, self.door_open_time);
                *left = unspent;
                if let Movement::Arrived(floor_num) = movement {
                    if let Some(floor) = self.floors.get_mut(floor_num as usize) {
                        floor.serve(elevator.going_up_indicator(), elevator.going_down_indicator());
                    }
                    debug!("t={:.2}s elevator {} stopped at floor {}", self.clock, elevator.index(), floor_num);
                }
            }
            self.dispatch_events();

            if remaining.iter().all(|left| *left <= 0.0) {
                break;
            }
        }

        self.controller.update(dt, &mut self.elevators, &mut self.floors);
        self.dispatch_events();
    }

    pub fn press_up_button(&mut self, floor_num: FloorNum) {
        self.press_hall_button(floor_num, FloorEvent::UpButtonPressed);
    }

    pub fn press_down_button(&mut self, floor_num: FloorNum) {
        self.press_hall_button(floor_num, FloorEvent::DownButtonPressed);
    }

    pub fn press_floor_button(&mut self, elevator: usize, floor_num: FloorNum) {
        match self.elevators.get_mut(elevator) {
            Some(car) => {
                car.press_floor_button(floor_num);
                self.dispatch_events();
            }
            None => warn!("Cab button pressed in unknown elevator {}", elevator),
        }
    }

    pub fn set_load_factor(&mut self, elevator: usize, load_factor: f64) {
        match self.elevators.get_mut(elevator) {
            Some(car) => car.set_load_factor(load_factor),
            None => warn!("Load factor set on unknown elevator {}", elevator),
        }
    }

    pub fn elapsed(&self) -> f64 {
        self.clock
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn elevators(&self) -> &[SimElevator] {
        &self.elevators
    }

    pub fn floors(&self) -> &[SimFloor] {
        &self.floors
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            time: self.clock,
            elevators: self.elevators.iter().map(SimElevator::snapshot).collect(),
            floors: self.floors.iter().map(SimFloor::snapshot).collect(),
        }
    }

    fn press_hall_button(&mut self, floor_num: FloorNum, event: FloorEvent) {
        match self.floors.get_mut(floor_num as usize) {
            Some(floor) => {
                floor.press(event);
                self.dispatch_events();
            }
            None => warn!("{} on unknown floor {}", event, floor_num),
        }
    }

    /**
     * Delivers raised events to the controller.
     *
     * Each round takes everything raised so far, cars first, then floors. Handlers may raise more
     * events, which go to the next round. After `MAX_DISPATCH_ROUNDS` the rest is dropped.
     */
    fn dispatch_events(&mut self) {
        for _ in 0..MAX_DISPATCH_ROUNDS {
            let mut delivered = false;

            for index in 0..self.elevators.len() {
                for event in self.elevators[index].take_events() {
                    trace!("Delivering {:?} for elevator {}", event, index);
                    self.controller
                        .handle_elevator_event(index, event, &mut self.elevators, &mut self.floors);
                    delivered = true;
                }
            }

            for index in 0..self.floors.len() {
                for event in self.floors[index].take_events() {
                    trace!("Delivering {} for floor {}", event, index);
                    self.controller
                        .handle_floor_event(index as FloorNum, event, &mut self.elevators, &mut self.floors);
                    delivered = true;
                }
            }

            if !delivered {
                return;
            }
        }

        let dropped: usize = self
            .elevators
            .iter_mut()
            .map(|elevator| elevator.take_events().len())
            .chain(self.floors.iter_mut().map(|floor| floor.take_events().len()))
            .sum();
        warn!(
            "Event delivery did not settle after {} rounds, dropped {} events",
            MAX_DISPATCH_ROUNDS, dropped
        );
    }
}
