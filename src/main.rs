/* 3rd party libraries */
use clap::{Arg, Command};
use crossbeam_channel as cbc;
use env_logger::Env;
use log::{error, info};
use std::thread::Builder;

/* Custom libraries */
use saga_controller::config;
use saga_controller::controller::SolutionController;
use saga_controller::host::Elevator;
use saga_controller::simulation::{Simulation, SimulationRunner, WorldSnapshot};
use saga_controller::unwrap_or_exit;

/* Main */
fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let matches = Command::new("saga-controller")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Runs the elevator solution against the scripted host")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .takes_value(true)
                .default_value("config.toml")
                .help("Path to the simulation configuration"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the final world snapshot as JSON"),
        )
        .get_matches();

    // Load the configuration
    let config_path = matches.value_of("config").unwrap_or("config.toml");
    let config = unwrap_or_exit!(config::load_config(config_path));

    // Initialize channels
    let (state_tx, state_rx) = cbc::unbounded::<WorldSnapshot>();
    let (terminate_tx, terminate_rx) = cbc::unbounded::<()>();

    // Start the host with the solution loaded
    let simulation = unwrap_or_exit!(Simulation::start(&config.simulation, SolutionController::new()));
    let runner = SimulationRunner::new(
        &config.simulation,
        &config.script,
        simulation,
        state_tx,
        terminate_rx,
    );

    let host_thread = Builder::new().name("host_simulation".into());
    let host_handle = unwrap_or_exit!(host_thread.spawn(move || runner.run()));

    // Log every change of floor or queue
    let mut last: Option<WorldSnapshot> = None;
    for snapshot in state_rx.iter() {
        for car in snapshot.elevators.iter() {
            let previous = last.as_ref().and_then(|s| s.elevators.get(car.index));
            let changed = previous.map_or(true, |p| {
                p.current_floor != car.current_floor || p.destination_queue != car.destination_queue
            });
            if changed {
                info!(
                    "t={:>6.2}s elevator {} floor {} heading {} queue {:?}",
                    snapshot.time, car.index, car.current_floor, car.direction, car.destination_queue
                );
            }
        }
        last = Some(snapshot);
    }

    let simulation = match host_handle.join() {
        Ok(simulation) => simulation,
        Err(_) => {
            error!("ERROR: host simulation thread panicked");
            std::process::exit(1);
        }
    };
    drop(terminate_tx);

    for car in simulation.elevators() {
        info!(
            "Elevator {} finished at floor {} with {} queued stops",
            car.index(),
            car.current_floor(),
            car.destination_queue().len()
        );
    }

    if matches.is_present("json") {
        let snapshot = last.unwrap_or_else(|| simulation.snapshot());
        println!("{}", unwrap_or_exit!(serde_json::to_string_pretty(&snapshot)));
    }
}
