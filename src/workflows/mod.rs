pub mod mission;
pub mod roster;
