/*!
 * Threads
 *
 * OS-thread-backed execution contexts, the registry that lists them and
 * the language-level thread objects that point at them. Owned by the
 * runtime's thread subsystem; the directory only reads them.
 */

mod object;
mod os_thread;
mod registry;

pub use object::{PlatformThread, ThreadObject, VirtualThread};
pub use os_thread::OsThread;
pub use registry::ThreadRegistry;
