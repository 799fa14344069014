//! Shared parameter store bridging input, rendering and the audio callback.
//!
//! The main thread is the only writer: it copies the current snapshot,
//! changes one group, and publishes the result as a new immutable snapshot.
//! Readers load the latest snapshot without locking and keep using it for a
//! whole block or frame, so a multi-field update is never observed half-done.
//!
//! Replaced snapshots are parked on the writer side until no reader holds
//! them. A reader dropping its guard therefore never releases the last
//! reference, and the audio callback never frees memory.

use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;

use crate::params::{ChannelBiases, SynthParams};

/// Immutable copy of every live parameter
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParamSnapshot {
    pub synth: SynthParams,
    pub bias: ChannelBiases,
}

/// Atomically published parameter snapshot (single writer, many readers)
#[derive(Debug)]
pub struct ParameterStore {
    current: ArcSwap<ParamSnapshot>,
    /// Replaced snapshots possibly still loaded by a reader (writer-only)
    retired: Mutex<Vec<Arc<ParamSnapshot>>>,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(ParamSnapshot::default())
    }
}

impl ParameterStore {
    pub fn new(initial: ParamSnapshot) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
            retired: Mutex::new(Vec::new()),
        }
    }

    /// Latest published snapshot (lock-free, no allocation)
    #[inline]
    pub fn snapshot(&self) -> ParamSnapshot {
        **self.current.load()
    }

    /// Publish a whole new snapshot
    pub fn publish(&self, snapshot: ParamSnapshot) {
        let previous = self.current.swap(Arc::new(snapshot));

        let mut retired = self
            .retired
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        retired.push(previous);
        // Only the store's own handle left: free it here, on the writer
        retired.retain(|old| Arc::strong_count(old) > 1);
    }

    /// Copy the current snapshot, apply `f`, and publish the result
    pub fn update(&self, f: impl FnOnce(&mut ParamSnapshot)) {
        let mut next = self.snapshot();
        f(&mut next);
        self.publish(next);
    }
}
