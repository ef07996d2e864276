// Copyright 2025 the Keysurface Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounded FIFO between the platform's input delivery and the tracker's consumer loop.

use std::collections::VecDeque;

use crate::error::QueueFull;
use crate::event::InputEvent;

/// Bounded event queue. A push onto a full queue is rejected; queued events are never
/// dropped.
#[derive(Clone, Debug)]
pub struct EventQueue {
    items: VecDeque<InputEvent>,
    capacity: usize,
}

impl EventQueue {
    /// Create a queue holding at most `capacity` events.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an event, or hand it back if the queue is full.
    pub fn push(&mut self, event: InputEvent) -> Result<(), QueueFull> {
        if self.items.len() >= self.capacity {
            tracing::warn!(capacity = self.capacity, ?event, "input queue full, dropping event");
            return Err(QueueFull(event));
        }
        self.items.push_back(event);
        Ok(())
    }

    /// Oldest event.
    pub fn pop(&mut self) -> Option<InputEvent> {
        self.items.pop_front()
    }

    /// Queued event count.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maximum queued event count.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
