/*!
 * Core Module
 * Identity types, error handling and shared containers
 */

pub mod data_structures;
pub mod errors;
pub mod id;
pub mod shard_manager;
pub mod types;

// Re-export for convenience
pub use errors::*;
pub use shard_manager::ShardManager;
pub use types::*;
