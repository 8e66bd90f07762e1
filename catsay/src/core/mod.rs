//! Pure logic with no I/O.

pub mod caption;
