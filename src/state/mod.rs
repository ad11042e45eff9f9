//! Dashboard State
//!
//! - **slot**: `Loading | Error | Loaded` per resource
//! - **snapshot**: immutable view of the three slots
//! - **store**: publishes snapshots through a `watch` channel

mod slot;
mod snapshot;
mod store;

pub use slot::Slot;
pub use snapshot::{DashboardSnapshot, SlotKind};
pub use store::DashboardStore;
