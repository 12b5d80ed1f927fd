use crate::host::{Controller, Elevator, Floor};
use crate::shared::{ElevatorEvent, ElevatorEventKind, FloorNum};
use log::{debug, info, warn};

/// Floors queued on every idle event, in order.
pub const IDLE_ROUTE: [FloorNum; 4] = [0, 1, 2, 1];

/**
 * The solution pasted into the game editor.
 *
 * Drives the first elevator only. Each time that car goes idle it is sent around the fixed
 * route in `IDLE_ROUTE`, with no regard to hall calls, cab buttons or load. `update` does nothing.
 *
 * # Fields
 * - `bound`:   Index of the elevator bound during `init`, if there was one.
 */
#[derive(Debug, Default, Clone)]
pub struct SolutionController {
    bound: Option<usize>,
}

impl SolutionController {
    pub fn new() -> SolutionController {
        SolutionController { bound: None }
    }

    pub fn bound_elevator(&self) -> Option<usize> {
        self.bound
    }
}

impl Controller for SolutionController {
    fn init<E: Elevator, F: Floor>(&mut self, elevators: &mut [E], _floors: &mut [F]) {
        match elevators.first_mut() {
            Some(elevator) => {
                elevator.on(ElevatorEventKind::Idle);
                self.bound = Some(0);
                info!("Controller bound to elevator 0");
            }
            None => {
                warn!("Controller initialised without elevators, nothing to drive");
            }
        }
    }

    fn update<E: Elevator, F: Floor>(&mut self, _dt: f64, _elevators: &mut [E], _floors: &mut [F]) {}

    fn handle_elevator_event<E: Elevator, F: Floor>(
        &mut self,
        elevator: usize,
        event: ElevatorEvent,
        elevators: &mut [E],
        _floors: &mut [F],
    ) {
        if self.bound != Some(elevator) {
            return;
        }

        if let ElevatorEvent::Idle = event {
            if let Some(car) = elevators.get_mut(elevator) {
                for floor in IDLE_ROUTE {
                    car.go_to_floor(floor, false);
                }
                debug!("Elevator {} idle, queued route {:?}", elevator, IDLE_ROUTE);
            }
        }
    }
}
