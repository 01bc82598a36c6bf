/*!
 * Execution Directory Tests
 * Resolution and enumeration across both execution modes
 */

use execution_units::{
    BucketTable, Continuation, Coroutine, CoroutineKind, DirectoryConfig, ExecutionDirectory,
    ExecutionMode, ExecutionUnit, MonitorOwner, OsThread, ThreadObject, ThreadRegistry, UnitId,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn build(config: DirectoryConfig) -> ExecutionDirectory {
    ExecutionDirectory::builder()
        .with_config(config)
        .build()
        .unwrap()
}

fn ids(dir: &ExecutionDirectory) -> Vec<UnitId> {
    dir.units().map(|u| u.id()).collect()
}

#[test]
fn test_scenario_a_bucket_walk_order() {
    let dir = build(DirectoryConfig::fiber_capable().with_bucket_count(4));
    let c1 = Coroutine::new(CoroutineKind::Carrier, "C1");
    let c2 = Coroutine::virtual_thread("C2");
    let c3 = Coroutine::virtual_thread("C3");

    dir.buckets().insert_into(0, c1.clone()).unwrap();
    dir.buckets().insert_into(2, c2.clone()).unwrap();
    dir.buckets().insert_into(2, c3.clone()).unwrap();

    assert_eq!(dir.buckets().head(2).unwrap().id(), c2.id());
    assert_eq!(
        ids(&dir),
        vec![
            UnitId::Coroutine(c1.id()),
            UnitId::Coroutine(c2.id()),
            UnitId::Coroutine(c3.id()),
        ]
    );
}

#[test]
fn test_scenario_b_registry_walk_order() {
    let dir = build(DirectoryConfig::thread_only().with_bucket_count(8));
    let t1 = OsThread::new("T1");
    let t2 = OsThread::new("T2");
    let t3 = OsThread::new("T3");
    for t in [&t1, &t2, &t3] {
        dir.threads().attach(Arc::clone(t)).unwrap();
    }

    assert_eq!(
        ids(&dir),
        vec![
            UnitId::Thread(t1.id()),
            UnitId::Thread(t2.id()),
            UnitId::Thread(t3.id()),
        ]
    );
}

#[test]
fn test_scenario_c_released_and_destroyed_owner() {
    for config in [
        DirectoryConfig::thread_only(),
        DirectoryConfig::fiber_capable(),
    ] {
        let dir = build(config.with_bucket_count(8));
        let holder = OsThread::new("holder");
        dir.threads().attach(holder.clone()).unwrap();

        let token = MonitorOwner(0xdead_0000);
        dir.threads().claim_monitor(token, holder.clone()).unwrap();
        assert!(dir.resolve_owner(token, false).is_some());

        dir.threads().release_monitor(token);
        dir.threads().detach(holder.id()).unwrap();

        assert_eq!(dir.resolve_owner(token, false), None);
        assert_eq!(dir.resolve_owner(token, true), None);
    }
}

#[test]
fn test_scenario_c_with_coroutine_owners() {
    let dir = build(
        DirectoryConfig::fiber_capable()
            .with_yield_with_monitor(true)
            .with_bucket_count(8),
    );
    let vt = Coroutine::virtual_thread("holder");
    dir.buckets().insert(vt.clone()).unwrap();

    let token = MonitorOwner(0x7700);
    dir.buckets().claim_monitor(token, vt.clone()).unwrap();
    assert_eq!(
        dir.resolve_owner(token, true),
        Some(ExecutionUnit::Coroutine(vt.clone()))
    );

    // Torn down while still holding the monitor
    dir.buckets().remove(vt.id()).unwrap();
    assert_eq!(dir.resolve_owner(token, false), None);
}

#[test]
fn test_empty_stores_exhaust_immediately() {
    let thread_dir = build(DirectoryConfig::thread_only().with_bucket_count(8));
    assert!(thread_dir.units().is_exhausted());
    assert_eq!(thread_dir.units().next(), None);

    let fiber_dir = build(DirectoryConfig::fiber_capable().with_bucket_count(16));
    assert!(fiber_dir.units().is_exhausted());
    assert_eq!(fiber_dir.units().count(), 0);
}

#[test]
fn test_resolve_returns_installed_unit() {
    let dir = build(DirectoryConfig::fiber_capable().with_bucket_count(8));

    let vt_obj = ThreadObject::virtual_thread("worker-vt");
    let coro = Coroutine::virtual_thread("worker-vt");
    dir.buckets().insert(coro.clone()).unwrap();
    vt_obj
        .as_virtual()
        .unwrap()
        .set_continuation(Continuation::with_coroutine(coro.clone()));

    assert_eq!(
        dir.resolve(&vt_obj),
        Some(ExecutionUnit::Coroutine(coro.clone()))
    );

    // Terminated: continuation reference dropped
    vt_obj.as_virtual().unwrap().clear_continuation();
    assert_eq!(dir.resolve(&vt_obj), None);
}

#[test]
fn test_resolve_platform_thread_follows_carrier() {
    let dir = build(DirectoryConfig::fiber_capable().with_bucket_count(8));
    let carrier = OsThread::new("carrier-0");
    dir.threads().attach(carrier.clone()).unwrap();
    let obj = ThreadObject::started(carrier.clone());

    let native = Coroutine::new(CoroutineKind::Carrier, "carrier-0");
    let vt = Coroutine::virtual_thread("vt");
    carrier.mount(native.clone());
    assert_eq!(dir.resolve(&obj), Some(ExecutionUnit::Coroutine(native)));

    carrier.mount(vt.clone());
    assert_eq!(dir.resolve(&obj), Some(ExecutionUnit::Coroutine(vt)));

    carrier.unmount();
    assert_eq!(dir.resolve(&obj), Some(ExecutionUnit::Thread(carrier.clone())));

    obj.as_platform().unwrap().clear();
    assert_eq!(dir.resolve(&obj), None);
}

#[test]
fn test_mode_changes_store_not_contract() {
    let threads = Arc::new(ThreadRegistry::new());
    let buckets = Arc::new(BucketTable::new(8).unwrap());

    let t = OsThread::new("shared");
    threads.attach(t.clone()).unwrap();
    let native = Coroutine::new(CoroutineKind::Carrier, "shared");
    buckets.insert(native.clone()).unwrap();
    let token = MonitorOwner(0x42);
    threads.claim_monitor(token, t.clone()).unwrap();
    let obj = ThreadObject::started(t.clone());

    let thread_dir = ExecutionDirectory::new(
        DirectoryConfig::thread_only().with_bucket_count(8),
        threads.clone(),
        buckets.clone(),
    );
    let fiber_dir = ExecutionDirectory::new(
        DirectoryConfig::fiber_capable().with_bucket_count(8),
        threads,
        buckets,
    );

    assert_eq!(thread_dir.mode(), ExecutionMode::ThreadOnly);
    assert_eq!(fiber_dir.mode(), ExecutionMode::FiberCapable);

    // Same calls, different backing store
    assert_eq!(ids(&thread_dir), vec![UnitId::Thread(t.id())]);
    assert_eq!(ids(&fiber_dir), vec![UnitId::Coroutine(native.id())]);

    assert_eq!(thread_dir.resolve(&obj), Some(ExecutionUnit::Thread(t.clone())));
    assert_eq!(fiber_dir.resolve(&obj), Some(ExecutionUnit::Thread(t.clone())));

    t.mount(native.clone());
    assert_eq!(thread_dir.resolve(&obj), Some(ExecutionUnit::Thread(t.clone())));
    assert_eq!(
        fiber_dir.resolve(&obj),
        Some(ExecutionUnit::Coroutine(native.clone()))
    );

    assert_eq!(
        thread_dir.resolve_owner(token, false),
        Some(ExecutionUnit::Thread(t.clone()))
    );
    assert_eq!(
        fiber_dir.resolve_owner(token, false),
        Some(ExecutionUnit::Coroutine(native))
    );
}
