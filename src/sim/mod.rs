//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod backdrop;
pub mod contact;
pub mod entity;
pub mod scheduler;
pub mod scroll;
pub mod session;
pub mod spawner;
pub mod state;
pub mod tick;

pub use backdrop::Backdrop;
pub use contact::{Contact, ContactTracker, Outcome, classify};
pub use entity::{Entity, EntityId, EntityTag, FlapAnimation, PhysicsBody, Player, category};
pub use scheduler::{Scheduler, TimerHandle};
pub use scroll::Scroll;
pub use session::{Phase, SessionState, SessionSummary};
pub use spawner::{SpawnEvent, roll_offset};
pub use state::{EngineCommand, GameEvent, GameState, TimerEvent};
pub use tick::{TickInput, tick};
