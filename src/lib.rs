//! # sheetstat - Deterministic Derived-Stat Engine for Witcher TRPG Sheets
//!
//! A recalculation engine for tabletop character sheets that provides:
//! - **Deterministic** resolution (same snapshot → same output)
//! - **Pure** evaluation: the host owns persistence, dice and UI
//! - **Typed** modifiers, decided once when a document is read
//! - **Explainable** results with a per-stat modifier breakdown
//!
//! ## Core Concepts
//!
//! ### Resolution Pipeline
//!
//! ```text
//! [CharacterBaseState] → [StatResolver] → [ResolvedCharacter] → update document
//! ```
//!
//! 1. **Modifiers** from the sheet and active effects fold into an additive
//!    total and a divisor per stat
//! 2. **Encumbrance** from carried weight and worn armor penalizes ref, dex
//!    and spd
//! 3. **Health state** (wounded, dead) overrides attribute currents
//! 4. **Derived values** (pools, core stats, unarmed attacks) follow from
//!    the currents
//!
//! ### Key Features
//!
//! - **Dependency Graph**: which outputs a changed input can touch
//! - **Skill Checks**: roll formulas with optional per-term annotations
//! - **House Rules**: rule constants loadable from TOML
//! - **Lenient Input**: malformed modifiers are skipped, never fatal
//!
//! ## Example
//!
//! ```rust
//! use sheetstat::*;
//!
//! let character = CharacterBaseState::new()
//!     .with_attribute(Attribute::Body, 6)
//!     .with_attribute(Attribute::Will, 8)
//!     .with_hp_value(0);
//!
//! let resolved = StatResolver::new().resolve(&character).unwrap();
//! assert!(resolved.death_state_applied());
//! assert_eq!(resolved.current(Attribute::Body), 2); // floor(6 / 3)
//! ```
//!
//! ## Modules
//!
//! - [`stat_id`] - Attribute, stat and skill identifiers
//! - [`modifier`] - Modifier directives and active effects
//! - [`accumulator`] - Modifier accumulation
//! - [`inventory`] - Carried items and coin
//! - [`character`] - Character input model
//! - [`health`] - Wound and death states
//! - [`resolver`] - Main stat resolver
//! - [`resolved`] - Resolution results and update documents
//! - [`skill`] - Skill-check roll formulas
//! - [`graph`] - Dependency graph management
//! - [`config`] - Rule constants
//! - [`numeric`] - Integer division helpers
//! - [`error`] - Error types

pub mod accumulator;
pub mod character;
pub mod config;
pub mod error;
pub mod graph;
pub mod health;
pub mod inventory;
pub mod modifier;
pub mod numeric;
pub mod resolved;
pub mod resolver;
pub mod skill;
pub mod stat_id;

// Re-export main types for convenience
pub use character::{ActorKind, CharacterBaseState, SocialStanding};
pub use config::ResolverConfig;
pub use error::StatError;
pub use health::HealthState;
pub use modifier::{ActiveEffect, Modifier, StaticModifier};
pub use resolved::ResolvedCharacter;
pub use resolver::StatResolver;
pub use skill::{RollFormula, SkillCheck};
pub use stat_id::{Attribute, CoreStat, DerivedStat, Skill, StatTarget};
