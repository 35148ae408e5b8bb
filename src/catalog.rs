//! Node catalog provider.
//!
//! Loads the record list (a JSON array of objects with at least `food` and
//! `type` keys) and resolves each record's category into a group, a color and
//! a grid anchor on the menu canvas.

use crate::error::{LayoutError, Result};
use crate::init_config::{CanvasConfig, CategoryConfig};
use crate::particle::{GroupId, Particle, ParticleSpec};
use palette::Srgb;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use ultraviolet::DVec2;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CatalogRecord {
    #[serde(rename = "food")]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Everything else in the record, passed through to the render sink.
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub kind: String,
    pub row: u32,
    pub col: u32,
    pub color: Srgb<u8>,
}

impl Category {
    fn from_config(config: &CategoryConfig) -> Result<Self> {
        let color = config
            .color
            .parse::<Srgb<u8>>()
            .map_err(|_| LayoutError::InvalidColor {
                kind: config.kind.clone(),
                color: config.color.clone(),
            })?;
        Ok(Self {
            name: config.name.clone(),
            kind: config.kind.clone(),
            row: config.row,
            col: config.col,
            color,
        })
    }

    pub fn hex_color(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.color.red, self.color.green, self.color.blue)
    }
}

/// Records plus the category table they refer to. A record's group is the
/// index of its category.
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<Category>,
    records: Vec<CatalogRecord>,
    by_kind: HashMap<String, usize>,
}

pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<CatalogRecord>> {
    let content = fs::read_to_string(path)?;
    parse_records(&content)
}

pub fn parse_records(content: &str) -> Result<Vec<CatalogRecord>> {
    Ok(serde_json::from_str(content)?)
}

impl Catalog {
    /// Fails if a color does not parse or a record names an unknown category.
    pub fn new(categories: &[CategoryConfig], records: Vec<CatalogRecord>) -> Result<Self> {
        let categories = categories
            .iter()
            .map(Category::from_config)
            .collect::<Result<Vec<_>>>()?;
        let by_kind = categories
            .iter()
            .enumerate()
            .map(|(i, c)| (c.kind.clone(), i))
            .collect::<HashMap<_, _>>();

        for record in &records {
            if !by_kind.contains_key(&record.kind) {
                return Err(LayoutError::UnknownCategory {
                    name: record.name.clone(),
                    kind: record.kind.clone(),
                });
            }
        }

        Ok(Self {
            categories,
            records,
            by_kind,
        })
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    pub fn group_of(&self, kind: &str) -> Option<GroupId> {
        self.by_kind.get(kind).map(|&i| GroupId(i as u32))
    }

    pub fn category(&self, group: GroupId) -> Option<&Category> {
        self.categories.get(group.0 as usize)
    }

    pub fn find(&self, name: &str) -> Option<&CatalogRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.records.iter().position(|r| r.name == name)
    }

    /// Record a particle was created from, via its label.
    pub fn record_for(&self, particle: &Particle) -> Option<&CatalogRecord> {
        particle.label.and_then(|i| self.records.get(i))
    }

    fn category_of(&self, record: &CatalogRecord) -> (GroupId, &Category) {
        // Every record's kind was checked against the table in `new`.
        let index = self.by_kind[&record.kind];
        (GroupId(index as u32), &self.categories[index])
    }

    /// One particle per record, anchored on its category's grid cell and
    /// scattered uniformly over the canvas to start. Each particle is labelled
    /// with its record index.
    pub fn menu_particles(&self, canvas: &CanvasConfig, rng: &mut fastrand::Rng) -> Vec<Particle> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let (group, category) = self.category_of(record);
                let anchor = canvas.cell_anchor(category.row, category.col);
                let start = DVec2::new(rng.f64() * canvas.width, rng.f64() * canvas.height);
                Particle::new(start, anchor, canvas.radius, group).with_label(i)
            })
            .collect()
    }

    /// Spec for putting the record called `name` on the plate: every plate
    /// node is pulled to the plate centre.
    pub fn plate_spec(&self, name: &str, canvas: &CanvasConfig) -> Result<ParticleSpec> {
        let index = self
            .position_of(name)
            .ok_or_else(|| LayoutError::UnknownRecord(name.to_string()))?;
        let (group, _) = self.category_of(&self.records[index]);
        Ok(ParticleSpec::new(canvas.center(), canvas.radius, group).with_label(index))
    }

    /// Plate contents at startup: for each record in catalog order, one copy
    /// per occurrence of its name in `defaults`. Unknown names are ignored.
    pub fn default_plate(&self, defaults: &[String], canvas: &CanvasConfig) -> Vec<(String, ParticleSpec)> {
        let mut specs = Vec::new();
        for (i, record) in self.records.iter().enumerate() {
            let count = defaults.iter().filter(|d| **d == record.name).count();
            let (group, _) = self.category_of(record);
            for _ in 0..count {
                specs.push((
                    record.name.clone(),
                    ParticleSpec::new(canvas.center(), canvas.radius, group).with_label(i),
                ));
            }
        }
        specs
    }
}
