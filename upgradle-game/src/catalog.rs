//! Static upgrade and generator definitions.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::state::WordLength;

const DEFAULT_UPGRADE_DATA: &str =
    include_str!("../../upgradle-web/static/assets/data/upgrades.json");
const DEFAULT_GENERATOR_DATA: &str =
    include_str!("../../upgradle-web/static/assets/data/generators.json");

/// Effect bundle granted by an upgrade purchase.
/// All fields default to "no effect" if not specified in JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpgradeEffect {
    #[serde(default)]
    pub payout_bonus: f64,
    #[serde(default)]
    pub payout_multiplier: Option<f64>,
    #[serde(default)]
    pub guess_limit: u32,
    #[serde(default)]
    pub unlock_length: Option<WordLength>,
    #[serde(default)]
    pub show_hot_cold: bool,
    #[serde(default)]
    pub idle_multiplier: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Upgrade {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub base_cost: f64,
    pub cost_growth: f64,
    /// `None` means the upgrade can be leveled forever.
    #[serde(default)]
    pub max_level: Option<u32>,
    pub tier: u32,
    /// One-time secondary-currency price charged on every level purchase.
    #[serde(default)]
    pub word_cost: Option<u32>,
    #[serde(default)]
    pub requires: Option<String>,
    #[serde(default)]
    pub effect: UpgradeEffect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generator {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub base_cost: f64,
    pub cost_growth: f64,
    /// Currency per tick for each unit owned.
    pub base_income: f64,
    pub tier: u32,
    #[serde(default)]
    pub requires: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct UpgradeFile {
    #[serde(default)]
    upgrades: Vec<Upgrade>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct GeneratorFile {
    #[serde(default)]
    generators: Vec<Generator>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate catalog id `{0}`")]
    DuplicateId(String),
    #[error("`{id}` requires unknown id `{requires}`")]
    UnknownRequirement { id: String, requires: String },
    #[error("`{id}` has an invalid cost curve (base {base_cost}, growth {cost_growth})")]
    InvalidCurve {
        id: String,
        base_cost: f64,
        cost_growth: f64,
    },
}

/// Complete purchasable content for a session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub upgrades: Vec<Upgrade>,
    pub generators: Vec<Generator>,
}

impl Catalog {
    /// Parse and validate catalog data from its two JSON documents.
    ///
    /// # Errors
    ///
    /// Returns an error if either document fails to parse, an id is duplicated,
    /// a prerequisite points at an unknown id, or a cost curve cannot grow.
    pub fn from_json(upgrades_json: &str, generators_json: &str) -> Result<Self, CatalogError> {
        let upgrades: UpgradeFile = serde_json::from_str(upgrades_json)?;
        let generators: GeneratorFile = serde_json::from_str(generators_json)?;
        let catalog = Self {
            upgrades: upgrades.upgrades,
            generators: generators.generators,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load the catalog bundled with the web assets.
    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_UPGRADE_DATA, DEFAULT_GENERATOR_DATA).unwrap_or_else(|err| {
            log::warn!("bundled catalog rejected, running without purchases: {err}");
            Self::default()
        })
    }

    #[must_use]
    pub fn find_upgrade(&self, id: &str) -> Option<&Upgrade> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    #[must_use]
    pub fn find_generator(&self, id: &str) -> Option<&Generator> {
        self.generators.iter().find(|g| g.id == id)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let upgrade_ids = unique_ids(self.upgrades.iter().map(|u| u.id.as_str()))?;
        let generator_ids = unique_ids(self.generators.iter().map(|g| g.id.as_str()))?;

        for upgrade in &self.upgrades {
            check_curve(&upgrade.id, upgrade.base_cost, upgrade.cost_growth)?;
            check_requirement(&upgrade.id, upgrade.requires.as_deref(), &upgrade_ids)?;
        }
        for generator in &self.generators {
            check_curve(&generator.id, generator.base_cost, generator.cost_growth)?;
            check_requirement(&generator.id, generator.requires.as_deref(), &generator_ids)?;
        }
        Ok(())
    }
}

fn unique_ids<'a>(ids: impl Iterator<Item = &'a str>) -> Result<HashSet<&'a str>, CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId(id.to_string()));
        }
    }
    Ok(seen)
}

fn check_curve(id: &str, base_cost: f64, cost_growth: f64) -> Result<(), CatalogError> {
    if base_cost > 0.0 && base_cost.is_finite() && cost_growth > 1.0 && cost_growth.is_finite() {
        Ok(())
    } else {
        Err(CatalogError::InvalidCurve {
            id: id.to_string(),
            base_cost,
            cost_growth,
        })
    }
}

fn check_requirement(
    id: &str,
    requires: Option<&str>,
    known: &HashSet<&str>,
) -> Result<(), CatalogError> {
    match requires {
        Some(req) if !known.contains(req) => Err(CatalogError::UnknownRequirement {
            id: id.to_string(),
            requires: req.to_string(),
        }),
        _ => Ok(()),
    }
}
