// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Configuration constants.

/// Capacity in bytes of the production audit storage area.
pub const LOG_CAPACITY: usize = 1024;

/// Smallest payload a caller may submit (a single 32-bit record id).
pub const MIN_PAYLOAD_SIZE: usize = 4;

/// Caller payloads must be sized in multiples of this.
pub const PAYLOAD_ALIGN: usize = 4;
