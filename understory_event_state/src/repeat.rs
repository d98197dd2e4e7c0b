// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Button auto-repeat timing.
//!
//! [`AutoRepeat`] holds the button being repeated and the time accumulated since it was
//! armed. Each frame, [`AutoRepeat::advance`] reports how many synthetic presses are due.
//! The first press waits for the full delay; after that one press is due per elapsed
//! repeat interval, so a long frame can produce several.
//!
//! ```
//! use understory_event_state::repeat::AutoRepeat;
//!
//! let mut repeat = AutoRepeat::new();
//! repeat.arm(0_u8);
//! assert_eq!(repeat.advance(0.2, 0.3, 0.1), 0);
//! assert_eq!(repeat.advance(0.15, 0.3, 0.1), 1);
//! assert_eq!(repeat.advance(0.25, 0.3, 0.1), 2);
//! ```

/// Auto-repeat bookkeeping for a single held button.
#[derive(Clone, Debug)]
pub struct AutoRepeat<B> {
    button: Option<B>,
    elapsed: f64,
    repeating: bool,
}

impl<B: Copy + PartialEq> Default for AutoRepeat<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Copy + PartialEq> AutoRepeat<B> {
    /// Create a disarmed repeater.
    pub fn new() -> Self {
        Self {
            button: None,
            elapsed: 0.0,
            repeating: false,
        }
    }

    /// Start repeating `button`; the initial delay starts now.
    pub fn arm(&mut self, button: B) {
        self.button = Some(button);
        self.elapsed = 0.0;
        self.repeating = false;
    }

    /// Stop repeating.
    pub fn disarm(&mut self) {
        self.button = None;
        self.elapsed = 0.0;
        self.repeating = false;
    }

    /// The button being repeated, if armed.
    pub fn button(&self) -> Option<B> {
        self.button
    }

    /// Returns true if armed.
    pub fn is_armed(&self) -> bool {
        self.button.is_some()
    }

    /// Returns true once the initial delay has passed.
    pub fn is_repeating(&self) -> bool {
        self.repeating
    }

    /// Advance by `dt` seconds and return the number of presses due.
    ///
    /// Returns `0` when disarmed or when `rate` is not positive.
    pub fn advance(&mut self, dt: f64, delay: f64, rate: f64) -> u32 {
        if self.button.is_none() || rate <= 0.0 {
            return 0;
        }
        self.elapsed += dt;
        if !self.repeating {
            if self.elapsed < delay {
                return 0;
            }
            self.repeating = true;
            self.elapsed = rate;
        } else if self.elapsed < rate {
            return 0;
        }
        let mut due = 0;
        loop {
            due += 1;
            self.elapsed -= rate;
            if self.elapsed < rate {
                break;
            }
        }
        due
    }
}
