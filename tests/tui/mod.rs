//! Headless binary tests.

mod common;
pub mod headless_test;
