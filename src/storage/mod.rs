// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Fixed-capacity byte storage.

pub mod ring;

pub use ring::{advance, RingBuffer};
