// Host application: drives the analytics core from the command line.

pub mod commands;
pub mod render;
pub mod stopwatch_session;
