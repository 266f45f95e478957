// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Diagnostic mirroring.
//!
//! After a successful append the store hands the raw frame to a
//! [`DiagnosticSink`]. The sink is best-effort: it cannot fail the append,
//! and it must never observe partially committed state.

use std::cell::RefCell;
use std::rc::Rc;

/// Receives a copy of every frame the store commits.
pub trait DiagnosticSink {
    fn mirror(&mut self, frame: &[u8]);
}

/// Discards every frame. The default when no diagnostic channel is wired up.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn mirror(&mut self, _frame: &[u8]) {}
}

/// Accumulates mirrored frames behind a shared handle, so the frames stay
/// reachable after the sink is handed to a store.
#[derive(Clone, Debug, Default)]
pub struct CaptureSink {
    frames: Rc<RefCell<Vec<Vec<u8>>>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.frames.borrow().clone()
    }
}

impl DiagnosticSink for CaptureSink {
    fn mirror(&mut self, frame: &[u8]) {
        self.frames.borrow_mut().push(frame.to_vec());
    }
}
