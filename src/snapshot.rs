//! Game state data model and its JSON wire format.
//!
//! The server always answers with the complete state. A response is decoded
//! into [`GameState`], validated, then sealed into an immutable [`Snapshot`]
//! stamped with the local reception time.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{SnapshotError, SyncError};

/// A continuously changing quantity (gold, wood, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    /// Amount held when the server produced the state.
    pub owned: f64,
    /// Signed rate in amount per second.
    pub income: f64,
    /// Storage cap. `None` means unbounded.
    #[serde(default)]
    pub maximum: Option<f64>,
}

/// `amount` of `resource`, used for both costs and per-unit incomes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceAmount {
    pub resource: String,
    pub amount: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub owned: u32,
    pub cost: Vec<ResourceAmount>,
    /// Per-unit yield as reported by the server. Display only.
    #[serde(default)]
    pub income: Vec<ResourceAmount>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Upgrade {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// 0 = not bought, 1 = bought.
    pub owned: u32,
    pub cost: Vec<ResourceAmount>,
}

impl Upgrade {
    pub fn purchased(&self) -> bool {
        self.owned > 0
    }
}

/// Response body of both the bootstrap and the purchase endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub resources: Vec<Resource>,
    pub buildings: Vec<Building>,
    pub upgrades: Vec<Upgrade>,
}

impl GameState {
    /// Check every invariant a freshly received state must satisfy.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        unique_names("resource", self.resources.iter().map(|r| r.name.as_str()))?;
        unique_names("building", self.buildings.iter().map(|b| b.name.as_str()))?;
        unique_names("upgrade", self.upgrades.iter().map(|u| u.name.as_str()))?;

        for r in &self.resources {
            non_negative(&r.name, "owned", r.owned)?;
            finite(&r.name, "income", r.income)?;
            if let Some(maximum) = r.maximum {
                non_negative(&r.name, "maximum", maximum)?;
                if r.owned > maximum {
                    return Err(SnapshotError::AboveMaximum {
                        name: r.name.clone(),
                        owned: r.owned,
                        maximum,
                    });
                }
            }
        }

        let known: HashSet<&str> = self.resources.iter().map(|r| r.name.as_str()).collect();
        for b in &self.buildings {
            amounts(&b.name, "cost", &b.cost, &known)?;
            amounts(&b.name, "income", &b.income, &known)?;
        }
        for u in &self.upgrades {
            if u.owned > 1 {
                return Err(SnapshotError::UpgradeCount {
                    name: u.name.clone(),
                    owned: u.owned,
                });
            }
            amounts(&u.name, "cost", &u.cost, &known)?;
        }
        Ok(())
    }
}

fn unique_names<'a>(
    category: &'static str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), SnapshotError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(SnapshotError::DuplicateName {
                category,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

fn finite(name: &str, field: &'static str, value: f64) -> Result<(), SnapshotError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SnapshotError::NotFinite {
            name: name.to_string(),
            field,
        })
    }
}

fn non_negative(name: &str, field: &'static str, value: f64) -> Result<(), SnapshotError> {
    finite(name, field, value)?;
    if value < 0.0 {
        return Err(SnapshotError::Negative {
            name: name.to_string(),
            field,
            value,
        });
    }
    Ok(())
}

fn amounts(
    name: &str,
    field: &'static str,
    entries: &[ResourceAmount],
    known: &HashSet<&str>,
) -> Result<(), SnapshotError> {
    for entry in entries {
        if !known.contains(entry.resource.as_str()) {
            return Err(SnapshotError::UnknownResource {
                name: name.to_string(),
                resource: entry.resource.clone(),
            });
        }
        non_negative(name, field, entry.amount)?;
    }
    Ok(())
}

/// Immutable, validated server state plus the moment it arrived.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    state: GameState,
    received_at: f64,
    origin: u64,
}

impl Snapshot {
    /// Seal a validated state. `origin` is the sequence number of the request
    /// whose response carried it.
    pub fn new(state: GameState, received_at: f64, origin: u64) -> Result<Self, SnapshotError> {
        state.validate()?;
        Ok(Self {
            state,
            received_at,
            origin,
        })
    }

    /// Decode and validate a response body.
    pub fn from_json(body: &str, received_at: f64, origin: u64) -> Result<Self, SyncError> {
        let state: GameState = serde_json::from_str(body)?;
        Ok(Self::new(state, received_at, origin)?)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn resources(&self) -> &[Resource] {
        &self.state.resources
    }

    pub fn buildings(&self) -> &[Building] {
        &self.state.buildings
    }

    pub fn upgrades(&self) -> &[Upgrade] {
        &self.state.upgrades
    }

    /// Local clock reading (seconds) when the response was received.
    pub fn received_at(&self) -> f64 {
        self.received_at
    }

    pub fn origin(&self) -> u64 {
        self.origin
    }
}

/// Every entity category shown on the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Resource,
    Building,
    Upgrade,
}

impl EntityKind {
    /// The purchase kind for clickable entities; resources cannot be bought.
    pub fn purchase_kind(self) -> Option<PurchaseKind> {
        match self {
            EntityKind::Resource => None,
            EntityKind::Building => Some(PurchaseKind::Building),
            EntityKind::Upgrade => Some(PurchaseKind::Upgrade),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseKind {
    Building,
    Upgrade,
}

/// Body of a purchase POST, sent as a url-encoded form. Never stored.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PurchaseRequest {
    pub clicked: PurchaseKind,
    pub name: String,
    pub number_purchased: u32,
}

impl PurchaseRequest {
    pub fn single(name: impl Into<String>, kind: PurchaseKind) -> Self {
        Self {
            clicked: kind,
            name: name.into(),
            number_purchased: 1,
        }
    }
}
