//! Small shared utilities with no domain state of their own.

pub mod normalize;
