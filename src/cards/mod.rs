//! Card system: canonical shape, cost table, repair/validation, registry.
//!
//! ## Key Types
//!
//! - `Card`: A playable card with a type-tagged `CardEffects`
//! - `CostTable`: type × rarity → cost; the only source of card cost
//! - `CardValidator`: turns untrusted JSON into canonical cards
//! - `CardRegistry`: Card lookup and deck building

pub mod cost;
pub mod definition;
pub mod registry;
pub mod validator;

pub use cost::CostTable;
pub use definition::{
    AttackEffects, Card, CardEffects, CardType, IpDelta, MediaEffects, Rarity, TargetScope, TargetSpec,
    ZoneEffects,
};
pub use registry::{CardRegistry, LoadReport, RegistryError};
pub use validator::{CardValidator, RepairReport, ValidationReport, ValidationSummary};
