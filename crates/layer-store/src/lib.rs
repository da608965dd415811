//! Layer hierarchy storage.
//!
//! [`HierarchyStore`] keeps sections, groups and layers in an arena guarded
//! by one `RwLock`. Layer order is the position in the parent group's id
//! list, so indices stay contiguous through any mix of create, delete and
//! rearrange. Each group carries a revision for optimistic callers.
//!
//! The store can be written to and restored from a JSON [`Snapshot`].

mod arena;
pub mod error;
pub mod snapshot;
pub mod store;
pub mod types;

pub use error::{Result, StoreError};
pub use snapshot::{SNAPSHOT_VERSION, Snapshot, read_snapshot, write_snapshot};
pub use store::HierarchyStore;
pub use types::{Direction, FULL_DEPTH, LayerNode, NodeId, Rearranged, Removed, StoreStats};
