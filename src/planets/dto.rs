use serde::{Deserialize, Serialize};

use crate::store::Planet;

#[derive(Debug, Serialize, Deserialize)]
pub struct PlanetView {
    pub id: i64,
    pub name: String,
    pub diameter: i64,
    pub population: i64,
    pub terrain: String,
}

impl From<Planet> for PlanetView {
    fn from(p: Planet) -> Self {
        Self {
            id: p.id,
            name: p.name,
            diameter: p.diameter,
            population: p.population,
            terrain: p.terrain,
        }
    }
}
