/*
 * Unit tests for the scripted host and its runner
 *
 * The unit tests follows the Arrange, Act, Assert pattern.
 *
 * Tests:
 * - controller lifecycle ordering (init strictly first, exactly once)
 * - the solution controller's route through the scripted host
 * - hall calls, cab buttons and the dispatch loop guard
 * - the threaded runner over crossbeam channels
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod world_tests {
    use crate::config::{ConfigError, ScriptedCall, SimulationConfig};
    use crate::controller::{SolutionController, IDLE_ROUTE};
    use crate::host::{Controller, Elevator, Floor};
    use crate::shared::{ElevatorEvent, ElevatorEventKind, FloorEvent, FloorNum};
    use crate::simulation::world::MAX_DISPATCH_ROUNDS;
    use crate::simulation::{Simulation, SimulationRunner, WorldSnapshot};
    use crossbeam_channel::unbounded;
    use std::thread::spawn;
    use std::time::Duration;

    fn setup_config() -> SimulationConfig {
        SimulationConfig {
            n_floors: 4,
            n_elevators: 2,
            max_passenger_count: 4,
            floors_per_second: 1.0,
            door_open_time: 0.5,
            tick_interval: 1,
            time_scale: 50.0,
            run_time: 1.0,
        }
    }

    /// Logs every call the host makes, in order.
    #[derive(Default)]
    struct LifecycleController {
        calls: Vec<&'static str>,
    }

    impl Controller for LifecycleController {
        fn init<E: Elevator, F: Floor>(&mut self, elevators: &mut [E], _floors: &mut [F]) {
            self.calls.push("init");
            for elevator in elevators.iter_mut() {
                elevator.on(ElevatorEventKind::Idle);
                elevator.on(ElevatorEventKind::StoppedAtFloor);
            }
        }

        fn update<E: Elevator, F: Floor>(&mut self, _dt: f64, _elevators: &mut [E], _floors: &mut [F]) {
            self.calls.push("update");
        }

        fn handle_elevator_event<E: Elevator, F: Floor>(
            &mut self,
            elevator: usize,
            event: ElevatorEvent,
            elevators: &mut [E],
            _floors: &mut [F],
        ) {
            self.calls.push("event");
            if event == ElevatorEvent::Idle {
                elevators[elevator].go_to_floor(1, false);
            }
        }
    }

    /// Wraps the solution and records where the first car stops.
    struct StopRecorder {
        inner: SolutionController,
        stops: Vec<FloorNum>,
    }

    impl Controller for StopRecorder {
        fn init<E: Elevator, F: Floor>(&mut self, elevators: &mut [E], floors: &mut [F]) {
            self.inner.init(elevators, floors);
            elevators[0].on(ElevatorEventKind::StoppedAtFloor);
        }

        fn update<E: Elevator, F: Floor>(&mut self, dt: f64, elevators: &mut [E], floors: &mut [F]) {
            self.inner.update(dt, elevators, floors);
        }

        fn handle_elevator_event<E: Elevator, F: Floor>(
            &mut self,
            elevator: usize,
            event: ElevatorEvent,
            elevators: &mut [E],
            floors: &mut [F],
        ) {
            if let ElevatorEvent::StoppedAtFloor(floor) = event {
                self.stops.push(floor);
            }
            self.inner.handle_elevator_event(elevator, event, elevators, floors);
        }
    }

    /// Sends the first car to every floor whose up button is pressed.
    #[derive(Default)]
    struct HallCallController {
        calls: Vec<(FloorNum, FloorEvent)>,
        cab: Vec<FloorNum>,
    }

    impl Controller for HallCallController {
        fn init<E: Elevator, F: Floor>(&mut self, elevators: &mut [E], floors: &mut [F]) {
            for floor in floors.iter_mut() {
                floor.on(FloorEvent::UpButtonPressed);
            }
            elevators[0].on(ElevatorEventKind::FloorButtonPressed);
        }

        fn update<E: Elevator, F: Floor>(&mut self, _dt: f64, _elevators: &mut [E], _floors: &mut [F]) {}

        fn handle_elevator_event<E: Elevator, F: Floor>(
            &mut self,
            _elevator: usize,
            event: ElevatorEvent,
            _elevators: &mut [E],
            _floors: &mut [F],
        ) {
            if let ElevatorEvent::FloorButtonPressed(floor) = event {
                self.cab.push(floor);
            }
        }

        fn handle_floor_event<E: Elevator, F: Floor>(
            &mut self,
            floor_num: FloorNum,
            event: FloorEvent,
            elevators: &mut [E],
            _floors: &mut [F],
        ) {
            self.calls.push((floor_num, event));
            elevators[0].go_to_floor(floor_num, false);
        }
    }

    /// Re-checks an empty queue from its idle handler, which raises idle again.
    #[derive(Default)]
    struct RestlessController {
        idles: usize,
    }

    impl Controller for RestlessController {
        fn init<E: Elevator, F: Floor>(&mut self, elevators: &mut [E], _floors: &mut [F]) {
            elevators[0].on(ElevatorEventKind::Idle);
        }

        fn update<E: Elevator, F: Floor>(&mut self, _dt: f64, _elevators: &mut [E], _floors: &mut [F]) {}

        fn handle_elevator_event<E: Elevator, F: Floor>(
            &mut self,
            elevator: usize,
            _event: ElevatorEvent,
            elevators: &mut [E],
            _floors: &mut [F],
        ) {
            self.idles += 1;
            elevators[elevator].check_destination_queue();
        }
    }

    #[test]
    fn test_init_runs_once_and_first() {
        // Purpose: Verify that init strictly precedes every update and event, and runs once

        // Arrange
        let config = setup_config();

        // Act
        let mut simulation = Simulation::start(&config, LifecycleController::default()).unwrap();
        for _ in 0..40 {
            simulation.step(0.25);
        }

        // Assert
        let calls = &simulation.controller().calls;
        assert_eq!(calls.first(), Some(&"init"));
        assert_eq!(calls.iter().filter(|call| **call == "init").count(), 1);
        assert_eq!(calls.iter().filter(|call| **call == "update").count(), 40);
        assert!(calls.contains(&"event"));
    }

    #[test]
    fn test_start_delivers_idle_to_solution() {
        // Purpose: Verify that the solution's first car is sent on its route as soon as the host starts

        // Arrange
        let config = setup_config();

        // Act
        let simulation = Simulation::start(&config, SolutionController::new()).unwrap();

        // Assert
        let snapshot = simulation.snapshot();
        assert_eq!(snapshot.elevators[0].destination_queue, IDLE_ROUTE.to_vec());
        assert!(snapshot.elevators[1].destination_queue.is_empty());
        assert_eq!(simulation.controller().bound_elevator(), Some(0));
    }

    #[test]
    fn test_solution_repeats_route() {
        // Purpose: Verify that the car keeps cycling through the same stops, whatever its load

        // Arrange
        let config = setup_config();
        let recorder = StopRecorder { inner: SolutionController::new(), stops: Vec::new() };
        let mut simulation = Simulation::start(&config, recorder).unwrap();
        simulation.set_load_factor(0, 0.8);

        // Act
        for _ in 0..200 {
            simulation.step(0.25);
        }

        // Assert
        let stops = &simulation.controller().stops;
        let expected: Vec<FloorNum> = IDLE_ROUTE.iter().cycle().take(8).copied().collect();
        assert!(stops.len() >= 8);
        assert_eq!(stops[..8], expected[..]);
        assert_eq!(simulation.elapsed(), 50.0);
    }

    #[test]
    fn test_hall_call_is_delivered_and_served() {
        // Arrange
        let config = setup_config();
        let mut simulation = Simulation::start(&config, HallCallController::default()).unwrap();

        // Act
        simulation.press_up_button(3);
        let pressed = simulation.floors()[3].up_pressed();
        for _ in 0..16 {
            simulation.step(0.25);
        }

        // Assert
        assert!(pressed);
        assert_eq!(simulation.controller().calls, vec![(3, FloorEvent::UpButtonPressed)]);
        assert_eq!(simulation.elevators()[0].current_floor(), 3);
        assert!(!simulation.floors()[3].up_pressed());
    }

    #[test]
    fn test_unsubscribed_events_are_not_delivered() {
        // Arrange
        let config = setup_config();
        let mut simulation = Simulation::start(&config, HallCallController::default()).unwrap();

        // Act
        simulation.press_down_button(2);
        simulation.press_floor_button(0, 1);
        simulation.press_floor_button(1, 2);

        // Assert
        assert!(simulation.controller().calls.is_empty());
        assert_eq!(simulation.controller().cab, vec![1]);
        assert!(simulation.floors()[2].down_pressed());
        assert_eq!(simulation.snapshot().elevators[1].pressed_floors, vec![2]);
    }

    #[test]
    fn test_dispatch_stops_after_max_rounds() {
        // Purpose: Verify that a handler re-triggering itself cannot stall the host

        // Arrange
        let config = setup_config();

        // Act
        let simulation = Simulation::start(&config, RestlessController::default()).unwrap();

        // Assert
        assert_eq!(simulation.controller().idles, MAX_DISPATCH_ROUNDS);
    }

    #[test]
    fn test_one_long_step_matches_many_short_ones() {
        // Purpose: Verify that cars travel at the configured speed whatever the step size

        // Arrange
        let config = SimulationConfig { n_floors: 6, n_elevators: 1, door_open_time: 0.25, ..setup_config() };
        let recorder = || StopRecorder { inner: SolutionController::new(), stops: Vec::new() };
        let mut coarse = Simulation::start(&config, recorder()).unwrap();
        let mut fine = Simulation::start(&config, recorder()).unwrap();

        // Act
        coarse.step(4.5);
        for _ in 0..90 {
            fine.step(0.05);
        }

        // Assert
        for simulation in [&coarse, &fine] {
            let car = &simulation.elevators()[0];
            assert_eq!(simulation.controller().stops, vec![0, 1, 2, 1]);
            assert_eq!(car.destination_queue(), &IDLE_ROUTE[..]);
            assert_eq!(car.current_floor(), 1);
            assert!((car.position() - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_long_step_moves_the_car() {
        // Arrange
        let config = SimulationConfig { n_elevators: 1, door_open_time: 0.0, ..setup_config() };
        let mut simulation = Simulation::start(&config, SolutionController::new()).unwrap();

        // Act
        simulation.step(2.5);

        // Assert
        let car = &simulation.elevators()[0];
        assert_eq!(car.destination_queue(), &[1]);
        assert_eq!(car.current_floor(), 2);
        assert!((car.position() - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_start_rejects_building_without_floors() {
        // Purpose: Verify that the host refuses settings it cannot run instead of panicking

        // Arrange
        let no_floors = SimulationConfig { n_floors: 0, ..setup_config() };
        let no_speed = SimulationConfig { floors_per_second: 0.0, ..setup_config() };

        // Act & Assert
        for config in [no_floors, no_speed] {
            let result = Simulation::start(&config, SolutionController::new());
            assert!(matches!(result, Err(ConfigError::Invalid(_))));
        }
    }

    #[test]
    fn test_invalid_step_is_ignored() {
        // Arrange
        let config = setup_config();
        let mut simulation = Simulation::start(&config, SolutionController::new()).unwrap();

        // Act
        simulation.step(-1.0);
        simulation.step(f64::NAN);

        // Assert
        assert_eq!(simulation.elapsed(), 0.0);
    }

    #[test]
    fn test_runner_publishes_snapshots_until_run_time() {
        // Purpose: Verify that the runner steps the world on its own thread and stops at run_time

        // Arrange
        let config = setup_config();
        let (state_tx, state_rx) = unbounded::<WorldSnapshot>();
        let (_terminate_tx, terminate_rx) = unbounded::<()>();
        let script = vec![ScriptedCall::UpButton { at: 0.0, floor: 2 }];
        let simulation = Simulation::start(&config, SolutionController::new()).unwrap();
        let runner = SimulationRunner::new(&config, &script, simulation, state_tx, terminate_rx);

        // Act
        let runner_thread = spawn(move || runner.run());
        let first = match state_rx.recv_timeout(Duration::from_secs(3)) {
            Ok(snapshot) => snapshot,
            Err(e) => panic!("Error receiving from state_rx: {:?}", e),
        };
        let simulation = runner_thread.join().unwrap();
        let rest: Vec<WorldSnapshot> = state_rx.try_iter().collect();

        // Assert
        assert!(first.floors[2].up_button);
        assert!(rest.len() >= 19);
        assert!(simulation.elapsed() >= 1.0 - 1e-9);
        assert!(rest.windows(2).all(|pair| pair[0].time < pair[1].time));
    }

    #[test]
    fn test_runner_terminates_on_request() {
        // Arrange
        let config = SimulationConfig { run_time: 1.0e9, ..setup_config() };
        let (state_tx, state_rx) = unbounded::<WorldSnapshot>();
        let (terminate_tx, terminate_rx) = unbounded::<()>();
        let simulation = Simulation::start(&config, SolutionController::new()).unwrap();
        let runner = SimulationRunner::new(&config, &[], simulation, state_tx, terminate_rx);
        let runner_thread = spawn(move || runner.run());

        // Act
        for _ in 0..3 {
            if let Err(e) = state_rx.recv_timeout(Duration::from_secs(3)) {
                panic!("Error receiving from state_rx: {:?}", e);
            }
        }
        terminate_tx.send(()).unwrap();
        let simulation = runner_thread.join().unwrap();

        // Assert
        assert!(simulation.elapsed() > 0.0);
        assert!(simulation.elapsed() < config.run_time);
    }
}
