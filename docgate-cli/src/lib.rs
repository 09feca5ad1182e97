//! docgate command-line interface
//!
//! The `docgate` binary is a thin shell over these modules; they are exposed
//! as a library so command handlers can be exercised from integration tests.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
