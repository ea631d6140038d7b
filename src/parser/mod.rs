//! Share-link parsing
//!
//! One decoder per protocol lives under [`explodes`]; [`explode`] picks the
//! decoder by scheme and [`explode_sub`] handles whole subscription bodies.

pub mod explodes;

pub use explodes::common::{explode, explode_sub};
