//! Shared helpers for JsonDB benchmarks.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod utils;
