//! # ZG01 Protocol Module
//!
//! Implementation of the ZG01 sensor bitstream protocol.
//!
//! This module handles:
//! - Frame assembly from timestamped bit edges (40 bits, 5 bytes)
//! - Frame-boundary detection from inter-bit timing
//! - MSB-first bit packing
//! - Protocol constants and frame types

pub mod assembler;
pub mod protocol;
