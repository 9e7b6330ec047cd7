//! Integration test crate for PictureBook.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! Pointer input is driven through the canvas the way a host would,
//! and the results are checked against the timeline and the render cache.

#[cfg(test)]
mod support;

#[cfg(test)]
mod interaction;

#[cfg(test)]
mod rendering;

#[cfg(test)]
mod config;
