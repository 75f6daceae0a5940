//! VAT, withholding tax, personal income tax and budget calculations for
//! Thai small businesses.
//!
//! Every calculation is a pure function over a snapshot of transactions
//! supplied by the caller; nothing is cached between calls.

pub mod core;
