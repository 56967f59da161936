//! Utility functions for front ends and the analyzer.

pub mod allowance;
pub mod paths;

#[doc(inline)]
pub use allowance::{check_allow_with_reason, AllowCheck};
#[doc(inline)]
pub use paths::split_last;
