use crate::commands::{process_command, LayoutCommand};
use crate::particle::Particle;
use crate::profile_scope;
use crate::simulation::{Simulation, TickOutcome};
use crossbeam::channel::{Receiver, Sender, TryRecvError};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Latest state published for a render sink to poll.
#[derive(Clone, Debug, Default)]
pub struct RenderState {
    pub tick: u64,
    pub alpha: f64,
    pub particles: Vec<Particle>,
    pub settled: bool,
}

/// Final arrangement sent when a set goes idle.
#[derive(Clone, Debug)]
pub struct SettledLayout {
    pub tick: u64,
    pub particles: Vec<Particle>,
}

pub fn render(simulation: &Simulation, shared: &Mutex<RenderState>, settled: bool) {
    let mut lock = shared.lock();
    lock.tick = simulation.frame;
    lock.alpha = simulation.alpha();
    lock.particles.clear();
    lock.particles.extend_from_slice(simulation.particles());
    lock.settled = settled;
}

/// Drive `simulation` until every command sender is dropped, then hand it back.
///
/// Queued commands are applied between ticks. While the set is idle the loop
/// blocks on the queue instead of ticking.
pub fn run_layout_loop(
    rx: Receiver<LayoutCommand>,
    mut simulation: Simulation,
    shared: Arc<Mutex<RenderState>>,
    settled_tx: Option<Sender<SettledLayout>>,
    frame: Duration,
) -> Simulation {
    render(&simulation, &shared, !simulation.is_running());
    loop {
        if simulation.is_running() {
            loop {
                match rx.try_recv() {
                    Ok(cmd) => {
                        process_command(cmd, &mut simulation);
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => return simulation,
                }
            }
        } else {
            match rx.recv() {
                Ok(cmd) => {
                    process_command(cmd, &mut simulation);
                    continue;
                }
                Err(_) => return simulation,
            }
        }

        let outcome = {
            profile_scope!("simulation_loop");
            simulation.tick()
        };
        match outcome {
            TickOutcome::Advanced { .. } => render(&simulation, &shared, false),
            TickOutcome::Settled => {
                render(&simulation, &shared, true);
                eprintln!(
                    "[layout] settled {} particles at tick {}",
                    simulation.len(),
                    simulation.frame
                );
                if let Some(tx) = &settled_tx {
                    let layout = SettledLayout {
                        tick: simulation.frame,
                        particles: simulation.particles().to_vec(),
                    };
                    if tx.send(layout).is_err() {
                        eprintln!("[layout] settled listener is gone");
                    }
                }
            }
            TickOutcome::Idle => {}
        }

        #[cfg(feature = "profiling")]
        crate::PROFILER.lock().tick_and_report(600);

        if !frame.is_zero() {
            std::thread::sleep(frame);
        }
    }
}

/// A simulation running on its own thread.
pub struct LayoutDriver {
    pub commands: Sender<LayoutCommand>,
    pub render: Arc<Mutex<RenderState>>,
    pub settled: Receiver<SettledLayout>,
    handle: JoinHandle<Simulation>,
}

impl LayoutDriver {
    pub fn spawn(simulation: Simulation, frame: Duration) -> Self {
        let (tx, rx) = crossbeam::channel::unbounded();
        let (settled_tx, settled_rx) = crossbeam::channel::unbounded();
        let render = Arc::new(Mutex::new(RenderState::default()));
        let shared = Arc::clone(&render);
        let handle = std::thread::spawn(move || {
            run_layout_loop(rx, simulation, shared, Some(settled_tx), frame)
        });
        Self {
            commands: tx,
            render,
            settled: settled_rx,
            handle,
        }
    }

    /// Close the command queue and wait for the loop to return the simulation.
    pub fn shutdown(self) -> std::thread::Result<Simulation> {
        drop(self.commands);
        self.handle.join()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;
    use crate::particle::{GroupId, ParticleSpec};
    use std::time::Instant;
    use ultraviolet::DVec2;

    fn spec(x: f64) -> ParticleSpec {
        ParticleSpec::new(DVec2::new(x, 0.0), 5.0, GroupId(0))
    }

    fn wait_for_settled(driver: &LayoutDriver, len: usize) -> SettledLayout {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let layout = driver
                .settled
                .recv_timeout(remaining)
                .expect("layout did not settle in time");
            if layout.particles.len() == len {
                return layout;
            }
        }
    }

    #[test]
    fn queued_commands_apply_between_ticks() {
        let driver = LayoutDriver::spawn(Simulation::with_particles(Vec::new()), Duration::ZERO);
        driver.commands.send(LayoutCommand::Add { spec: spec(0.0) }).unwrap();
        driver.commands.send(LayoutCommand::Add { spec: spec(40.0) }).unwrap();

        let (reply_tx, reply_rx) = crossbeam::channel::bounded(1);
        driver
            .commands
            .send(LayoutCommand::Remove { index: 7, reply: Some(reply_tx) })
            .unwrap();
        assert!(matches!(
            reply_rx.recv_timeout(Duration::from_secs(5)).unwrap(),
            Err(LayoutError::InvalidIndex { index: 7, len: 2 })
        ));

        let layout = wait_for_settled(&driver, 2);
        assert!((layout.particles[0].position - DVec2::new(0.0, 0.0)).mag() < 1e-3);
        assert!((layout.particles[1].position - DVec2::new(40.0, 0.0)).mag() < 1e-3);
        assert!(driver.render.lock().settled);

        let sim = driver.shutdown().unwrap();
        assert_eq!(sim.len(), 2);
        assert!(!sim.is_running());
    }

    #[test]
    fn removal_restarts_a_settled_driver() {
        let driver = LayoutDriver::spawn(Simulation::with_particles(Vec::new()), Duration::ZERO);
        for x in [0.0, 30.0, 60.0] {
            driver.commands.send(LayoutCommand::Add { spec: spec(x) }).unwrap();
        }
        wait_for_settled(&driver, 3);

        driver.commands.send(LayoutCommand::Remove { index: 0, reply: None }).unwrap();
        let layout = wait_for_settled(&driver, 2);
        assert_eq!(layout.particles[0].anchor, DVec2::new(30.0, 0.0));

        let sim = driver.shutdown().unwrap();
        assert_eq!(sim.len(), 2);
    }

    #[test]
    fn loop_returns_when_senders_drop() {
        let (tx, rx) = crossbeam::channel::unbounded();
        let shared = Arc::new(Mutex::new(RenderState::default()));
        drop(tx);
        let sim = run_layout_loop(rx, Simulation::with_particles(Vec::new()), shared, None, Duration::ZERO);
        assert!(sim.is_empty());
    }
}
