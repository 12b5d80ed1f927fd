use crate::shared::{Direction, ElevatorEvent, ElevatorEventKind, FloorEvent, FloorNum};

/**
 * Capabilities the host simulation exposes for one elevator car.
 *
 * The host owns the car. A controller only reads and mutates it through these methods,
 * and only from inside `Controller::init`, `Controller::update` or an event handler.
 *
 * # Methods
 * - `on`:                          Subscribe the car to an event kind. Idempotent.
 * - `go_to_floor`:                 Queue a floor. With `force` the floor becomes the next stop.
 * - `stop`:                        Clear the queue and stop the car.
 * - `current_floor`:               The floor the car is at, or last passed.
 * - `going_up_indicator`:          Whether passengers heading up may board.
 * - `going_down_indicator`:        Whether passengers heading down may board.
 * - `max_passenger_count`:         Capacity of the car.
 * - `load_factor`:                 Occupancy in [0, 1].
 * - `destination_direction`:       Where the front of the queue lies relative to the car.
 * - `destination_queue`:           The floors the car will visit, in order.
 * - `check_destination_queue`:     Apply direct edits of the queue now.
 * - `get_pressed_floors`:          Floor buttons currently lit inside the car.
 */
pub trait Elevator {
    fn on(&mut self, event: ElevatorEventKind);
    fn go_to_floor(&mut self, floor_num: FloorNum, force: bool);
    fn stop(&mut self);
    fn current_floor(&self) -> FloorNum;
    fn going_up_indicator(&self) -> bool;
    fn set_going_up_indicator(&mut self, value: bool);
    fn going_down_indicator(&self) -> bool;
    fn set_going_down_indicator(&mut self, value: bool);
    fn max_passenger_count(&self) -> u32;
    fn load_factor(&self) -> f64;
    fn destination_direction(&self) -> Direction;
    fn destination_queue(&self) -> &[FloorNum];
    /// Edits take effect at the next natural check point unless followed by `check_destination_queue`.
    fn destination_queue_mut(&mut self) -> &mut Vec<FloorNum>;
    fn check_destination_queue(&mut self);
    fn get_pressed_floors(&self) -> Vec<FloorNum>;
}

pub trait Floor {
    fn floor_num(&self) -> FloorNum;
    fn on(&mut self, event: FloorEvent);
}

/**
 * A solution loaded into the host.
 *
 * `init` runs exactly once, before any `update` or event. `update` runs on every host tick with
 * the simulated seconds elapsed since the previous call. Events are delivered only for kinds the
 * controller subscribed to, with the controller's own state passed as `&mut self`.
 *
 * None of these may block: the host calls them synchronously inside its tick.
 */
pub trait Controller {
    fn init<E: Elevator, F: Floor>(&mut self, elevators: &mut [E], floors: &mut [F]);

    fn update<E: Elevator, F: Floor>(&mut self, dt: f64, elevators: &mut [E], floors: &mut [F]);

    fn handle_elevator_event<E: Elevator, F: Floor>(
        &mut self,
        _elevator: usize,
        _event: ElevatorEvent,
        _elevators: &mut [E],
        _floors: &mut [F],
    ) {
    }

    fn handle_floor_event<E: Elevator, F: Floor>(
        &mut self,
        _floor_num: FloorNum,
        _event: FloorEvent,
        _elevators: &mut [E],
        _floors: &mut [F],
    ) {
    }
}
