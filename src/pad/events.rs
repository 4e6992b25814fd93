//! # Pad Events
//!
//! The editor and the audio thread never share the path. Drag gestures
//! travel as [`PadEvent`]s through a bounded single-producer /
//! single-consumer ring buffer:
//!
//! ```text
//! Editor (GUI thread)                    process() (audio thread)
//!     │                                         │
//! [drag start]──BeginRecording──►┐              │
//! [drag move ]──Capture(x, y)────► ring ──►[drain]──► MemoryPad::apply
//! [drag end  ]──EndRecording────►┘              │
//! ```
//!
//! Popping never allocates or blocks, so the audio thread can drain the
//! queue at the top of every block.

use ringbuf::traits::{Consumer, Observer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use thiserror::Error;

/// A drag lifecycle event from the pad surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PadEvent {
    BeginRecording,
    /// Pointer position normalized to the pad's bounds, `(0, 0)` at the
    /// bottom-left. Not yet clamped.
    Capture { x: f32, y: f32 },
    EndRecording,
}

/// The queue was full and the event was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("pad event queue is full, dropped {0:?}")]
pub struct QueueFull(pub PadEvent);

/// Create a connected sender/receiver pair holding up to `capacity` events.
pub fn pad_event_queue(capacity: usize) -> (PadEventSender, PadEventReceiver) {
    let (producer, consumer) = HeapRb::<PadEvent>::new(capacity.max(1)).split();
    (
        PadEventSender { producer },
        PadEventReceiver { consumer },
    )
}

/// Sending half, owned by the editor.
pub struct PadEventSender {
    producer: HeapProd<PadEvent>,
}

impl PadEventSender {
    pub fn send(&mut self, event: PadEvent) -> Result<(), QueueFull> {
        self.producer.try_push(event).map_err(QueueFull)
    }

    /// Free slots left in the queue.
    pub fn vacant(&self) -> usize {
        self.producer.vacant_len()
    }
}

/// Receiving half, owned by the audio thread.
pub struct PadEventReceiver {
    consumer: HeapCons<PadEvent>,
}

impl PadEventReceiver {
    /// Pop every pending event in order, handing each to `handle`.
    pub fn drain(&mut self, mut handle: impl FnMut(PadEvent)) {
        while let Some(event) = self.consumer.try_pop() {
            handle(event);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.consumer.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
