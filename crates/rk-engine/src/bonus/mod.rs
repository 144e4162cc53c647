//! Bonus features: free spins, wheel, pick-and-click, and the coordinator
//! that triggers them from a settled grid.

pub mod coordinator;
pub mod free_spins;
pub mod pick;
pub mod wheel;

pub use coordinator::{BonusCoordinator, BonusTrigger};
pub use free_spins::{FreeSpinsState, FreeSpinsTick};
pub use pick::{PickBonus, PickResult};
pub use wheel::{WheelBonus, WheelOutcome};
