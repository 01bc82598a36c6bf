/*!
 * Thread Objects
 * Language-level thread handles as seen by the directory
 */

use super::os_thread::OsThread;
use crate::continuations::Continuation;
use arc_swap::ArcSwapOption;
use smartstring::alias::String as SmartString;
use std::sync::Arc;

/// Platform thread object
///
/// The backing slot is filled when the thread starts and cleared when it
/// exits.
#[derive(Debug)]
pub struct PlatformThread {
    name: SmartString,
    backing: ArcSwapOption<OsThread>,
}

impl PlatformThread {
    pub fn install(&self, thread: Arc<OsThread>) {
        self.backing.store(Some(thread));
    }

    pub fn clear(&self) -> Option<Arc<OsThread>> {
        self.backing.swap(None)
    }

    #[inline]
    pub fn backing(&self) -> Option<Arc<OsThread>> {
        self.backing.load_full()
    }
}

/// Virtual thread object
///
/// Tracks the continuation it is currently running; empty before the first
/// run and after termination.
#[derive(Debug)]
pub struct VirtualThread {
    name: SmartString,
    continuation: ArcSwapOption<Continuation>,
}

impl VirtualThread {
    pub fn set_continuation(&self, continuation: Arc<Continuation>) {
        self.continuation.store(Some(continuation));
    }

    pub fn clear_continuation(&self) -> Option<Arc<Continuation>> {
        self.continuation.swap(None)
    }

    #[inline]
    pub fn continuation(&self) -> Option<Arc<Continuation>> {
        self.continuation.load_full()
    }
}

/// Language-level thread object: `Thread` or a virtual thread
#[derive(Debug)]
pub enum ThreadObject {
    Platform(PlatformThread),
    Virtual(VirtualThread),
}

impl ThreadObject {
    /// Unstarted platform thread object
    pub fn platform(name: impl Into<SmartString>) -> Self {
        ThreadObject::Platform(PlatformThread {
            name: name.into(),
            backing: ArcSwapOption::empty(),
        })
    }

    /// Platform thread object already bound to `thread`
    pub fn started(thread: Arc<OsThread>) -> Self {
        let obj = Self::platform(thread.name());
        if let ThreadObject::Platform(platform) = &obj {
            platform.install(thread);
        }
        obj
    }

    /// Virtual thread object with no continuation yet
    pub fn virtual_thread(name: impl Into<SmartString>) -> Self {
        ThreadObject::Virtual(VirtualThread {
            name: name.into(),
            continuation: ArcSwapOption::empty(),
        })
    }

    #[inline]
    pub fn is_virtual(&self) -> bool {
        matches!(self, ThreadObject::Virtual(_))
    }

    pub fn name(&self) -> &str {
        match self {
            ThreadObject::Platform(t) => &t.name,
            ThreadObject::Virtual(t) => &t.name,
        }
    }

    /// OS thread backing a platform thread object
    #[inline]
    pub fn backing_thread(&self) -> Option<Arc<OsThread>> {
        match self {
            ThreadObject::Platform(t) => t.backing(),
            ThreadObject::Virtual(_) => None,
        }
    }

    /// Current continuation of a virtual thread object
    #[inline]
    pub fn current_continuation(&self) -> Option<Arc<Continuation>> {
        match self {
            ThreadObject::Platform(_) => None,
            ThreadObject::Virtual(t) => t.continuation(),
        }
    }

    pub fn as_platform(&self) -> Option<&PlatformThread> {
        match self {
            ThreadObject::Platform(t) => Some(t),
            ThreadObject::Virtual(_) => None,
        }
    }

    pub fn as_virtual(&self) -> Option<&VirtualThread> {
        match self {
            ThreadObject::Platform(_) => None,
            ThreadObject::Virtual(t) => Some(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::continuations::Coroutine;

    #[test]
    fn test_platform_backing_lifecycle() {
        let obj = ThreadObject::platform("main");
        assert!(!obj.is_virtual());
        assert!(obj.backing_thread().is_none());

        let os = OsThread::new("main");
        obj.as_platform().unwrap().install(os.clone());
        assert!(Arc::ptr_eq(&obj.backing_thread().unwrap(), &os));

        obj.as_platform().unwrap().clear();
        assert!(obj.backing_thread().is_none());
    }

    #[test]
    fn test_virtual_continuation_slot() {
        let obj = ThreadObject::virtual_thread("vt");
        assert!(obj.is_virtual());
        assert!(obj.current_continuation().is_none());
        assert!(obj.backing_thread().is_none());

        let cont = Continuation::with_coroutine(Coroutine::virtual_thread("vt"));
        obj.as_virtual().unwrap().set_continuation(cont);
        assert!(obj.current_continuation().unwrap().data().is_some());
        assert!(obj.as_platform().is_none());
    }

    #[test]
    fn test_started_takes_thread_name() {
        let obj = ThreadObject::started(OsThread::new("reaper"));
        assert_eq!(obj.name(), "reaper");
        assert!(obj.backing_thread().is_some());
    }
}
