//! mesasweep CLI library.
//!
//! Output rendering shared by the `mesasweep` binary's subcommands.

pub mod output;

pub use output::OutputFormat;
