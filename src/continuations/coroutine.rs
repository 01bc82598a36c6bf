/*!
 * Coroutines
 * Continuation-backed execution contexts and their language-level handle
 */

use crate::core::data_structures::RingMember;
use crate::core::id::next_coroutine_id;
use crate::core::types::{CoroutineId, MonitorOwner, ThreadId, UnitId};
use crate::monitors::OwnerIdentity;
use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use smartstring::alias::String as SmartString;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

const NO_CARRIER: u64 = 0;

/// What a coroutine stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoroutineKind {
    /// Native stack of a carrier OS thread
    Carrier,
    /// Virtual thread multiplexed over carriers
    Virtual,
}

/// Lifecycle state as last published by the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum CoroutineState {
    Created = 0,
    Running = 1,
    Suspended = 2,
    Finished = 3,
}

impl CoroutineState {
    #[inline]
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => CoroutineState::Running,
            2 => CoroutineState::Suspended,
            3 => CoroutineState::Finished,
            _ => CoroutineState::Created,
        }
    }
}

/// Continuation-backed execution context
#[derive(Debug)]
pub struct Coroutine {
    id: CoroutineId,
    kind: CoroutineKind,
    name: SmartString,
    state: AtomicU8,
    carrier: AtomicU64,
    blocked_on: Mutex<Option<MonitorOwner>>,
}

impl Coroutine {
    pub fn new(kind: CoroutineKind, name: impl Into<SmartString>) -> Arc<Self> {
        Arc::new(Self {
            id: next_coroutine_id(),
            kind,
            name: name.into(),
            state: AtomicU8::new(CoroutineState::Created as u8),
            carrier: AtomicU64::new(NO_CARRIER),
            blocked_on: Mutex::new(None),
        })
    }

    /// Virtual thread coroutine
    pub fn virtual_thread(name: impl Into<SmartString>) -> Arc<Self> {
        Self::new(CoroutineKind::Virtual, name)
    }

    #[inline]
    pub fn id(&self) -> CoroutineId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> CoroutineKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn state(&self) -> CoroutineState {
        CoroutineState::from_u8(self.state.load(Ordering::Acquire))
    }

    #[inline]
    pub fn set_state(&self, state: CoroutineState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Carrier thread this coroutine is mounted on, if any
    pub fn carrier(&self) -> Option<ThreadId> {
        match self.carrier.load(Ordering::Acquire) {
            NO_CARRIER => None,
            raw => Some(ThreadId(raw)),
        }
    }

    pub(crate) fn set_carrier(&self, carrier: Option<ThreadId>) {
        let raw = carrier.map_or(NO_CARRIER, |id| id.0);
        self.carrier.store(raw, Ordering::Release);
    }

    /// Monitor this coroutine is waiting to enter
    pub fn blocked_on(&self) -> Option<MonitorOwner> {
        *self.blocked_on.lock()
    }

    pub fn set_blocked_on(&self, token: Option<MonitorOwner>) {
        *self.blocked_on.lock() = token;
    }
}

impl RingMember for Coroutine {
    type Key = CoroutineId;

    #[inline]
    fn ring_key(&self) -> CoroutineId {
        self.id
    }
}

impl OwnerIdentity for Coroutine {
    #[inline]
    fn owner_id(&self) -> UnitId {
        UnitId::Coroutine(self.id)
    }
}

/// Language-level continuation object
///
/// Its data slot carries the coroutine that backs it once the runtime has
/// installed one.
#[derive(Debug, Default)]
pub struct Continuation {
    data: ArcSwapOption<Coroutine>,
}

impl Continuation {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Continuation whose data slot already holds `coroutine`
    pub fn with_coroutine(coroutine: Arc<Coroutine>) -> Arc<Self> {
        let cont = Self::default();
        cont.attach(coroutine);
        Arc::new(cont)
    }

    pub fn attach(&self, coroutine: Arc<Coroutine>) {
        self.data.store(Some(coroutine));
    }

    pub fn detach(&self) -> Option<Arc<Coroutine>> {
        self.data.swap(None)
    }

    /// Coroutine stored in the data slot
    #[inline]
    pub fn data(&self) -> Option<Arc<Coroutine>> {
        self.data.load_full()
    }
}
