//! Memory-side tests.
