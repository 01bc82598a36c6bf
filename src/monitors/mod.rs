/*!
 * Monitors
 * Ownership bookkeeping consulted by monitor-owner resolution
 */

mod owners;

pub use owners::{MonitorOwners, OwnerIdentity};
