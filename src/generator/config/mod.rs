pub mod group;
pub mod rules;
