// commands.rs
// Handles processing of LayoutCommand messages for a simulation

use crate::error::Result;
use crate::particle::{Particle, ParticleSpec};
use crate::simulation::Simulation;
use crossbeam::channel::Sender;

/// Requests queued from outside the tick boundary. The driver applies them
/// between ticks so indices never change mid-traversal.
#[derive(Debug)]
pub enum LayoutCommand {
    Add { spec: ParticleSpec },
    /// Remove by index. The outcome is sent back on `reply` when one is given.
    Remove {
        index: usize,
        reply: Option<Sender<Result<Particle>>>,
    },
    Clear,
    Start,
}

/// Apply a single command. Returns true when the set changed or was restarted.
pub fn process_command(cmd: LayoutCommand, simulation: &mut Simulation) -> bool {
    match cmd {
        LayoutCommand::Add { spec } => {
            simulation.add(spec);
            true
        }
        LayoutCommand::Remove { index, reply } => {
            let result = simulation.remove(index);
            let changed = result.is_ok();
            if let Err(err) = &result {
                eprintln!("[layout] remove ignored: {}", err);
            }
            if let Some(reply) = reply {
                // The requester may have stopped listening; the removal stands either way.
                let _ = reply.send(result);
            }
            changed
        }
        LayoutCommand::Clear => {
            let n = simulation.clear();
            eprintln!("[layout] cleared {} particles", n);
            true
        }
        LayoutCommand::Start => {
            simulation.start();
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;
    use crate::particle::GroupId;
    use ultraviolet::DVec2;

    fn spec() -> ParticleSpec {
        ParticleSpec::new(DVec2::new(1.0, 2.0), 4.0, GroupId(0))
    }

    #[test]
    fn add_and_remove_round_trip_through_commands() {
        let mut sim = Simulation::with_particles(Vec::new());
        assert!(process_command(LayoutCommand::Add { spec: spec() }, &mut sim));
        assert_eq!(sim.len(), 1);

        let (tx, rx) = crossbeam::channel::bounded(1);
        assert!(process_command(LayoutCommand::Remove { index: 0, reply: Some(tx) }, &mut sim));
        let removed = rx.recv().unwrap().unwrap();
        assert_eq!(removed.anchor, DVec2::new(1.0, 2.0));
        assert!(sim.is_empty());
    }

    #[test]
    fn bad_remove_replies_with_error() {
        let mut sim = Simulation::with_particles(Vec::new());
        let (tx, rx) = crossbeam::channel::bounded(1);
        assert!(!process_command(LayoutCommand::Remove { index: 2, reply: Some(tx) }, &mut sim));
        assert!(matches!(
            rx.recv().unwrap(),
            Err(LayoutError::InvalidIndex { index: 2, len: 0 })
        ));
        assert!(!sim.is_running());
    }

    #[test]
    fn dropped_reply_channel_is_harmless() {
        let mut sim = Simulation::with_particles(Vec::new());
        sim.add(spec());
        let (tx, rx) = crossbeam::channel::bounded(1);
        drop(rx);
        assert!(process_command(LayoutCommand::Remove { index: 0, reply: Some(tx) }, &mut sim));
        assert!(sim.is_empty());
    }

    #[test]
    fn start_and_clear_restart_the_clock() {
        let mut sim = Simulation::with_particles(Vec::new());
        process_command(LayoutCommand::Start, &mut sim);
        assert!(sim.is_running());
        sim.stop();
        process_command(LayoutCommand::Clear, &mut sim);
        assert!(sim.is_running());
    }
}
