pub mod knock;
pub mod resolver;
pub mod sequencer;
