//! Single-writer, multi-reader gesture channel.
//!
//! The tracking worker owns the only [`GesturePublisher`]; the render loop and
//! any presentation code hold cloned [`GestureReader`]s.
//!
//! Reads are a single relaxed atomic load, with no lock on the frame path. The
//! contract is "last write wins, visible by some later frame": a reader may
//! see the previous value for a frame or two after a change, which is
//! harmless at human gesture timescales.
//!
//! Subscribers additionally get a message per *change*; publishing the same
//! state twice sends nothing.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use crate::gesture::GestureState;

struct Shared {
    state: AtomicU8,
    subscribers: Mutex<Vec<Sender<GestureState>>>,
}

/// Create a connected publisher/reader pair, starting at [`GestureState::None`].
pub fn gesture_channel() -> (GesturePublisher, GestureReader) {
    let shared = Arc::new(Shared {
        state: AtomicU8::new(GestureState::None.into()),
        subscribers: Mutex::new(Vec::new()),
    });
    (
        GesturePublisher { shared: shared.clone() },
        GestureReader { shared },
    )
}

/// Writing end. Not `Clone`: there is exactly one writer.
pub struct GesturePublisher {
    shared: Arc<Shared>,
}

impl GesturePublisher {
    /// Store `state`. Returns `true` and notifies subscribers if it changed.
    pub fn publish(&self, state: GestureState) -> bool {
        let previous = self.shared.state.swap(state.into(), Ordering::Relaxed);
        if previous == u8::from(state) {
            return false;
        }
        // A poisoned list only means a subscriber panicked mid-push; the
        // senders inside are still valid.
        let mut subscribers = self
            .shared
            .subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        subscribers.retain(|tx| tx.send(state).is_ok());
        true
    }

    /// Current value as seen by the writer.
    pub fn current(&self) -> GestureState {
        GestureState::from_u8(self.shared.state.load(Ordering::Relaxed))
    }
}

/// Reading end. Cheap to clone; any number may exist.
#[derive(Clone)]
pub struct GestureReader {
    shared: Arc<Shared>,
}

impl GestureReader {
    /// Last published gesture.
    #[inline]
    pub fn current(&self) -> GestureState {
        GestureState::from_u8(self.shared.state.load(Ordering::Relaxed))
    }

    /// Receive every future change. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> Receiver<GestureState> {
        let (tx, rx) = mpsc::channel();
        self.shared
            .subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(tx);
        rx
    }
}
