// Copyright 2025 the Keysurface Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Computing evaluator: the external policy consulted during layout passes.

use crate::key::{Key, KeyData};

/// Policy hooks for the computing pass.
///
/// The layout engine never decides enablement or visibility on its own; it asks this
/// trait once per key per pass. Implementations typically consult editor state (field
/// type, subtype, clipboard availability).
pub trait ComputingEvaluator {
    /// Whether `key` should react to touches.
    fn evaluate_enabled(&self, key: &Key) -> bool;

    /// Whether `key` should be laid out at all.
    fn evaluate_visible(&self, key: &Key) -> bool;

    /// Whether `key` is a placeholder filled by [`slot_data`](Self::slot_data).
    fn is_slot(&self, key: &Key) -> bool;

    /// Contents for a slot key. A slot without contents is hidden.
    fn slot_data(&self, key: &Key) -> Option<KeyData> {
        let _ = key;
        None
    }
}

/// Evaluator that enables and shows every key and has no slots.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultEvaluator;

impl ComputingEvaluator for DefaultEvaluator {
    fn evaluate_enabled(&self, _key: &Key) -> bool {
        true
    }

    fn evaluate_visible(&self, _key: &Key) -> bool {
        true
    }

    fn is_slot(&self, _key: &Key) -> bool {
        false
    }
}

impl<E: ComputingEvaluator + ?Sized> ComputingEvaluator for &E {
    fn evaluate_enabled(&self, key: &Key) -> bool {
        (**self).evaluate_enabled(key)
    }

    fn evaluate_visible(&self, key: &Key) -> bool {
        (**self).evaluate_visible(key)
    }

    fn is_slot(&self, key: &Key) -> bool {
        (**self).is_slot(key)
    }

    fn slot_data(&self, key: &Key) -> Option<KeyData> {
        (**self).slot_data(key)
    }
}
