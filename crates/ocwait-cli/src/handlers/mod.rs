//! Command handlers, kept out of main.rs for testability

pub mod command;
pub mod env;

pub use command::{execute_command, poll_config, PollReport};
pub use env::{execute_env, load_environment, load_environment_with, render_environment};
