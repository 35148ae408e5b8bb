use crate::catalog::{self, Catalog};
use crate::config;
use crate::error::{LayoutError, Result};
use crate::init_config::InitConfig;
use crate::particle::Particle;
use crate::simulation::{tick_all, Simulation, TickOutcome};
use serde::Serialize;
use std::time::Duration;

pub mod command_loop;
pub mod simulation_loop;

pub use simulation_loop::{LayoutDriver, RenderState, SettledLayout};

#[derive(Serialize)]
struct PlacedNode<'a> {
    /// Position in the set; what `remove <index>` refers to.
    index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a serde_json::Map<String, serde_json::Value>>,
    category: &'a str,
    color: String,
    x: f64,
    y: f64,
    radius: f64,
}

#[derive(Serialize)]
struct LayoutLine<'a> {
    canvas: &'a str,
    tick: u64,
    nodes: Vec<PlacedNode<'a>>,
}

/// One JSON line describing a canvas. Particles labelled with a record index
/// carry that record's name and metadata.
fn layout_line(canvas: &str, tick: u64, particles: &[Particle], catalog: &Catalog) -> Result<String> {
    let nodes = particles
        .iter()
        .enumerate()
        .map(|(index, p)| {
            let category = catalog.category(p.group);
            let record = catalog.record_for(p);
            PlacedNode {
                index,
                name: record.map(|r| r.name.as_str()),
                metadata: record.map(|r| &r.metadata),
                category: category.map(|c| c.kind.as_str()).unwrap_or(""),
                color: category.map(|c| c.hex_color()).unwrap_or_default(),
                x: p.position.x,
                y: p.position.y,
                radius: p.radius,
            }
        })
        .collect();
    let line = LayoutLine { canvas, tick, nodes };
    Ok(serde_json::to_string(&line)?)
}

/// Run both canvases to rest in parallel.
fn settle(canvases: &mut [Simulation]) -> usize {
    for sim in canvases.iter_mut() {
        sim.start();
    }
    let mut ticks = 0;
    while ticks < config::MAX_SETTLE_TICKS {
        let outcomes = tick_all(canvases);
        if !outcomes.iter().any(|o| matches!(o, TickOutcome::Advanced { .. })) {
            break;
        }
        ticks += 1;
    }
    ticks
}

fn joined<T>(result: std::thread::Result<T>, name: &'static str) -> Result<T> {
    result.map_err(|_| LayoutError::ThreadPanicked(name))
}

pub fn run() {
    if let Err(err) = try_run() {
        eprintln!("[layout] {}", err);
        std::process::exit(1);
    }
}

fn try_run() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| "init_config.toml".to_string());
    let catalog_path = args.next().unwrap_or_else(|| "data/catalog.json".to_string());

    let init = match InitConfig::load_from_file(&config_path) {
        Ok(init) => init,
        Err(LayoutError::Io(err)) => {
            eprintln!("[layout] {}: {}; using built-in defaults", config_path, err);
            InitConfig::default()
        }
        Err(err) => return Err(err),
    };
    let catalog = Catalog::new(&init.categories, catalog::load_records(&catalog_path)?)?;
    eprintln!(
        "[layout] {} records in {} categories",
        catalog.records().len(),
        catalog.categories().len()
    );

    let mut rng = fastrand::Rng::with_seed(init.layout.spawn_seed);
    let menu = crate::create_particle_set(
        init.menu.layout_config(&init.layout, None),
        catalog.menu_particles(&init.menu, &mut rng),
    )?;
    let mut plate = Simulation::new(
        init.plate.layout_config(&init.layout, Some(init.plate.center())),
        Vec::new(),
    )?;
    for (_, spec) in catalog.default_plate(&init.defaults, &init.plate) {
        plate.add(spec);
    }

    let mut canvases = [menu, plate];
    let ticks = settle(&mut canvases);
    eprintln!("[layout] initial layout settled after {} ticks", ticks);
    let [menu, plate] = canvases;
    println!("{}", layout_line("menu", menu.frame, menu.particles(), &catalog)?);
    println!("{}", layout_line("plate", plate.frame, plate.particles(), &catalog)?);

    let driver = LayoutDriver::spawn(plate, Duration::from_millis(config::DEFAULT_FRAME_MS));
    let settled = driver.settled.clone();
    let catalog_ref = &catalog;
    std::thread::scope(|scope| -> Result<()> {
        let printer = scope.spawn(move || -> Result<()> {
            for layout in settled.iter() {
                println!("{}", layout_line("plate", layout.tick, &layout.particles, catalog_ref)?);
            }
            Ok(())
        });

        let stdin = std::io::stdin();
        command_loop::run_input_loop(stdin.lock(), &driver.commands, &catalog, &init.plate);

        let plate = joined(driver.shutdown(), "plate layout")?;
        eprintln!("[layout] plate closed with {} particles", plate.len());
        joined(printer.join(), "printer")?
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init_config::CanvasConfig;

    fn catalog() -> Catalog {
        let records = catalog::parse_records(
            r#"[
                {"food": "AMS 131", "type": "beverage", "img": "ams131"},
                {"food": "CMPS 12A", "type": "fruit"},
                {"food": "PHYS 5A", "type": "pastry"}
            ]"#,
        )
        .unwrap();
        Catalog::new(&InitConfig::default().categories, records).unwrap()
    }

    #[test]
    fn plate_lines_name_each_node_by_index() {
        let catalog = catalog();
        let plate = CanvasConfig::plate();
        let mut sim = Simulation::with_particles(Vec::new());
        for name in ["AMS 131", "PHYS 5A", "CMPS 12A"] {
            sim.add(catalog.plate_spec(name, &plate).unwrap());
        }
        sim.remove(1).unwrap();

        let line = layout_line("plate", sim.frame, sim.particles(), &catalog).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        let nodes = value["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0]["index"], 0);
        assert_eq!(nodes[0]["name"], "AMS 131");
        assert_eq!(nodes[0]["metadata"]["img"], "ams131");
        assert_eq!(nodes[0]["color"], "#81a2be");
        assert_eq!(nodes[1]["index"], 1);
        assert_eq!(nodes[1]["name"], "CMPS 12A");
        assert_eq!(nodes[1]["category"], "fruit");
    }

    #[test]
    fn unlabelled_particles_have_no_name() {
        let catalog = catalog();
        let particles = vec![Particle::at_anchor(ultraviolet::DVec2::zero(), 4.0, crate::particle::GroupId(0))];
        let line = layout_line("plate", 0, &particles, &catalog).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert!(value["nodes"][0].get("name").is_none());
        assert_eq!(value["nodes"][0]["category"], "fruit");
    }

    #[test]
    fn panicked_thread_maps_to_its_own_error() {
        let result = std::thread::spawn(|| -> u32 { panic!("boom") }).join();
        let err = joined(result, "printer").unwrap_err();
        assert!(matches!(err, LayoutError::ThreadPanicked("printer")));
        assert_eq!(err.to_string(), "printer thread panicked");
    }
}
