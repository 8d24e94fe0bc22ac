use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::{ConstructionType, Money, Sector, Technology};

/// Immutable snapshot of a capital project, as handed over by the calling
/// layer. The engine only reads it; there are no setters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub sector: Sector,
    pub building_type: String,
    pub construction_type: ConstructionType,
    pub location: ProjectLocation,
    /// Gross floor area, when known.
    pub size_sqft: Option<f64>,
    /// Dwelling/tenant unit count, when applicable.
    pub unit_count: Option<u32>,
    /// Nameplate capacity of the energy systems, kW.
    pub capacity_kw: Option<f64>,
    /// Estimated annual production, kWh. Drives per-kWh amount models.
    pub annual_production_kwh: Option<f64>,
    pub total_cost: Money,
    /// Target certification (e.g. "LEED Gold", "Passive House"), if any.
    pub target_certification: Option<String>,
    pub energy_systems: Vec<Technology>,
    pub flags: ProjectFlags,
}

/// Jurisdiction chain for the project site, most-specific last.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectLocation {
    /// Two-letter state code, e.g. "NY".
    pub state: String,
    pub county: Option<String>,
    pub city: Option<String>,
    /// Serving utility name, when known.
    pub utility: Option<String>,
}

/// Boolean qualification flags carried on the project snapshot. These gate
/// bonus adders and labor-condition multipliers.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ProjectFlags {
    /// Equipment sourcing qualifies for the domestic-content adder.
    pub domestic_content: bool,
    /// Owner has committed to prevailing-wage requirements.
    pub prevailing_wage: bool,
    /// Registered apprenticeship participation committed.
    pub apprenticeship: bool,
    /// Site is in a designated energy community.
    pub energy_community: bool,
    /// Site is in a designated low-income community.
    pub low_income_community: bool,
}

impl Project {
    /// True when the project's systems intersect the given technology list.
    /// An empty program list means technology-agnostic.
    pub fn has_any_technology(&self, technologies: &[Technology]) -> bool {
        technologies.is_empty()
            || technologies.iter().any(|t| self.energy_systems.contains(t))
    }

    /// Quantity for a per-unit amount model.
    pub fn unit_quantity(&self) -> Option<f64> {
        self.unit_count.map(f64::from)
    }
}
