//! Backend implementations.
//!
//! Each backend is gated behind a feature flag.
//!
//! | Backend | Feature | Description |
//! |---------|---------|-------------|
//! | Memory | `memory` | Process-local state, for tests and development |

#[cfg(feature = "memory")]
pub mod memory;
