use cluster_layout::catalog::{self, Catalog};
use cluster_layout::init_config::InitConfig;
use cluster_layout::simulation::{Simulation, TickOutcome};
use std::time::Instant;

fn main() {
    println!("=== Menu Settle Report ===");

    let init = InitConfig::load_default().unwrap_or_else(|err| {
        println!("init_config.toml not usable ({}), using defaults", err);
        InitConfig::default()
    });
    let records = match catalog::load_records("data/catalog.json") {
        Ok(records) => records,
        Err(err) => {
            println!("Could not read data/catalog.json: {}", err);
            return;
        }
    };
    let catalog = match Catalog::new(&init.categories, records) {
        Ok(catalog) => catalog,
        Err(err) => {
            println!("Bad catalog: {}", err);
            return;
        }
    };

    let mut rng = fastrand::Rng::with_seed(init.layout.spawn_seed);
    let particles = catalog.menu_particles(&init.menu, &mut rng);
    let mut sim = match Simulation::new(init.menu.layout_config(&init.layout, None), particles) {
        Ok(sim) => sim,
        Err(err) => {
            println!("Bad layout config: {}", err);
            return;
        }
    };
    println!("Settling {} particles", sim.len());

    sim.start();
    let start = Instant::now();
    loop {
        match sim.tick() {
            TickOutcome::Advanced { alpha } => {
                if sim.frame % 25 == 0 || sim.frame == 1 {
                    println!(
                        "tick {:>4}  alpha {:.5}  worst overlap {:>8.3}",
                        sim.frame,
                        alpha,
                        sim.max_overlap()
                    );
                }
            }
            TickOutcome::Settled | TickOutcome::Idle => break,
        }
    }

    let drift = sim
        .particles()
        .iter()
        .map(|p| (p.position - p.anchor).mag())
        .fold(0.0_f64, f64::max);
    println!(
        "Settled after {} ticks in {:.2}ms; worst overlap {:.3}, farthest from anchor {:.1}",
        sim.frame,
        start.elapsed().as_secs_f64() * 1000.0,
        sim.max_overlap(),
        drift
    );
}
