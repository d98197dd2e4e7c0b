// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Event State: input state machines that sit between raw device events and
//! widget callbacks.
//!
//! - [`click`]: turns button-down/button-up pairs into single, double, and triple clicks
//!   based on a timeout and a spatial tolerance.
//! - [`repeat`]: counts how many synthetic button presses a held button should produce per
//!   frame, given an initial delay and a repeat rate.
//!
//! Both machines are generic over the target/button key so they can be driven by any
//! widget handle type, and neither keeps a clock of its own: callers pass timestamps or
//! frame deltas in seconds.
//!
//! This crate is `no_std` and does not allocate.

#![no_std]

pub mod click;
pub mod repeat;
