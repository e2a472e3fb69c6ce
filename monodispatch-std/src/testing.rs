//! Testing utilities for monodispatch.
//!
//! # Features
//!
//! - [`RecordingHandler`]: A handler that records the type of every value it receives
//! - [`CountingHandler`]: A handler that only counts invocations

use monodispatch_core::{Dispatchable, Handler, HandlerResult, TypeTag};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Recording Handler
// ============================================================================

/// A handler that records the concrete type of each dispatched value and
/// returns a fixed output.
///
/// Clones share the same record, so keep one clone for assertions and
/// register the other.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingHandler::new("seen");
/// dispatcher.register_handler(TypeKey::exact::<i64>(), recorder.clone())?;
///
/// dispatcher.call(&1_i64, ())?;
/// assert_eq!(recorder.seen(), vec![TypeTag::of::<i64>()]);
/// ```
pub struct RecordingHandler<R> {
    seen: Arc<Mutex<Vec<TypeTag>>>,
    output: R,
}

impl<R: Clone> RecordingHandler<R> {
    /// Create a recorder that answers every call with `output`.
    pub fn new(output: R) -> Self {
        Self {
            seen: Arc::new(Mutex::new(Vec::new())),
            output,
        }
    }

    /// Types received so far, in call order.
    pub fn seen(&self) -> Vec<TypeTag> {
        self.lock().clone()
    }

    /// Number of calls so far.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Forget recorded calls.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<TypeTag>> {
        // A panicking test thread must not hide the calls recorded before it.
        self.seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<R: Clone> Clone for RecordingHandler<R> {
    fn clone(&self) -> Self {
        Self {
            seen: self.seen.clone(),
            output: self.output.clone(),
        }
    }
}

impl<A, R> Handler<A, R> for RecordingHandler<R>
where
    R: Clone + Send + Sync + 'static,
{
    fn call(&self, value: &dyn Dispatchable, _args: A) -> HandlerResult<R> {
        self.lock().push(value.type_tag());
        Ok(self.output.clone())
    }
}

// ============================================================================
// Counting Handler
// ============================================================================

/// A handler that counts how often it runs and returns `R::default()`.
#[derive(Clone, Default)]
pub struct CountingHandler {
    count: Arc<AtomicUsize>,
}

impl CountingHandler {
    /// Create a new counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of calls so far.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset to zero.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl<A, R: Default> Handler<A, R> for CountingHandler {
    fn call(&self, _value: &dyn Dispatchable, _args: A) -> HandlerResult<R> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(R::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::Dispatcher;
    use monodispatch_core::{TypeKey, type_set};

    #[test]
    fn test_recording_handler_shares_record() {
        let recorder = RecordingHandler::new(7_u32);
        let dispatcher = Dispatcher::<(), u32>::new(|_, _| Ok(0));
        dispatcher
            .register_handler(type_set![i64, u8], recorder.clone())
            .unwrap();

        assert_eq!(dispatcher.call(&1_i64, ()).unwrap(), 7);
        assert_eq!(dispatcher.call(&1_u8, ()).unwrap(), 7);
        assert_eq!(dispatcher.call(&'x', ()).unwrap(), 0);

        assert_eq!(recorder.seen(), vec![TypeTag::of::<i64>(), TypeTag::of::<u8>()]);
        recorder.clear();
        assert_eq!(recorder.count(), 0);
    }

    #[test]
    fn test_counting_handler() {
        let counter = CountingHandler::new();
        let dispatcher = Dispatcher::<(), ()>::new(|_, _| Ok(()));
        dispatcher
            .register_handler(TypeKey::exact::<String>(), counter.clone())
            .unwrap();

        dispatcher.call(&String::from("a"), ()).unwrap();
        dispatcher.call(&String::from("b"), ()).unwrap();
        dispatcher.call(&"c", ()).unwrap();
        assert_eq!(counter.count(), 2);

        counter.reset();
        assert_eq!(counter.count(), 0);
    }
}
