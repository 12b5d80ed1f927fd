use crate::config::{ScriptedCall, SimulationConfig};
use crate::host::Controller;
use crate::simulation::world::{Simulation, WorldSnapshot};
use crossbeam_channel as cbc;
use log::{debug, info};
use std::collections::VecDeque;
use std::time::Duration;

/**
 * Paces a `Simulation` on wall-clock ticks.
 *
 * Meant to run on its own thread. Every `tick_interval` the runner applies scripted button
 * presses that are due, steps the world by `tick_interval * time_scale` simulated seconds
 * and publishes a snapshot.
 *
 * # Fields
 * - `simulation`:      The world being driven.
 * - `script`:          Pending scripted calls, earliest first.
 * - `tick_interval`:   Wall-clock time between ticks.
 * - `dt`:              Simulated seconds per tick.
 * - `run_time`:        Simulated seconds after which the runner stops.
 * - `state_tx`:        Publishes a snapshot after every tick.
 * - `terminate_rx`:    Stops the runner when a message arrives.
 */
pub struct SimulationRunner<C: Controller> {
    simulation: Simulation<C>,
    script: VecDeque<ScriptedCall>,
    tick_interval: Duration,
    dt: f64,
    run_time: f64,
    state_tx: cbc::Sender<WorldSnapshot>,
    terminate_rx: cbc::Receiver<()>,
}

impl<C: Controller> SimulationRunner<C> {
    pub fn new(
        config: &SimulationConfig,
        script: &[ScriptedCall],
        simulation: Simulation<C>,
        state_tx: cbc::Sender<WorldSnapshot>,
        terminate_rx: cbc::Receiver<()>,
    ) -> SimulationRunner<C> {
        let mut script = script.to_vec();
        script.sort_by(|a, b| a.at().total_cmp(&b.at()));

        let tick_interval = Duration::from_millis(config.tick_interval);
        SimulationRunner {
            simulation,
            script: script.into(),
            tick_interval,
            dt: tick_interval.as_secs_f64() * config.time_scale,
            run_time: config.run_time,
            state_tx,
            terminate_rx,
        }
    }

    /// Runs until `run_time`, a terminate message, or the snapshot receiver going away.
    pub fn run(mut self) -> Simulation<C> {
        info!("Simulation started, running for {:.1} simulated seconds", self.run_time);

        while self.simulation.elapsed() < self.run_time {
            cbc::select! {
                recv(self.terminate_rx) -> _ => {
                    info!("Simulation terminated at t={:.2}s", self.simulation.elapsed());
                    return self.simulation;
                }
                default(self.tick_interval) => {
                    self.apply_due_calls();
                    self.simulation.step(self.dt);
                    if self.state_tx.send(self.simulation.snapshot()).is_err() {
                        debug!("Snapshot receiver closed, stopping simulation");
                        return self.simulation;
                    }
                }
            }
        }

        info!("Simulation finished at t={:.2}s", self.simulation.elapsed());
        self.simulation
    }

    fn apply_due_calls(&mut self) {
        let now = self.simulation.elapsed();

        while self.script.front().map_or(false, |call| call.at() <= now) {
            let Some(call) = self.script.pop_front() else {
                break;
            };
            debug!("t={:.2}s applying scripted {:?}", now, call);
            match call {
                ScriptedCall::UpButton { floor, .. } => self.simulation.press_up_button(floor),
                ScriptedCall::DownButton { floor, .. } => self.simulation.press_down_button(floor),
                ScriptedCall::CabButton { elevator, floor, .. } => {
                    self.simulation.press_floor_button(elevator, floor)
                }
            }
        }
    }
}
