/*!
 * Mode Selector Tests
 * The process-wide execution mode is fixed once
 */

use execution_units::{
    DirectoryConfig, DirectoryError, ExecutionDirectory, ExecutionMode, ThreadObject,
};
use serial_test::serial;

#[test]
#[serial]
fn test_mode_is_fixed_once() {
    let mode = ExecutionMode::install(ExecutionMode::FiberCapable).unwrap();
    assert_eq!(mode, ExecutionMode::FiberCapable);
    assert_eq!(ExecutionMode::current(), ExecutionMode::FiberCapable);

    // Re-installing the same mode is fine
    assert!(ExecutionMode::install(ExecutionMode::FiberCapable).is_ok());

    assert_eq!(
        ExecutionMode::install(ExecutionMode::ThreadOnly).unwrap_err(),
        DirectoryError::ModeAlreadyFixed {
            current: ExecutionMode::FiberCapable,
            requested: ExecutionMode::ThreadOnly,
        }
    );
}

#[test]
#[serial]
fn test_builder_without_config_uses_process_mode() {
    ExecutionMode::install(ExecutionMode::FiberCapable).unwrap();

    let dir = ExecutionDirectory::builder().build().unwrap();
    assert_eq!(dir.mode(), ExecutionMode::FiberCapable);
    assert_eq!(dir.config().mode, ExecutionMode::FiberCapable);
    assert!(dir.buckets().bucket_count().is_power_of_two());

    let vt = ThreadObject::virtual_thread("unstarted");
    assert!(dir.resolve(&vt).is_none());
}

#[test]
#[serial]
fn test_explicit_config_overrides_process_mode() {
    ExecutionMode::install(ExecutionMode::FiberCapable).unwrap();

    let dir = ExecutionDirectory::builder()
        .with_config(DirectoryConfig::thread_only().with_bucket_count(8))
        .build()
        .unwrap();
    assert_eq!(dir.mode(), ExecutionMode::ThreadOnly);
}
