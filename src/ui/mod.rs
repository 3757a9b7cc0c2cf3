//! Console presentation for the `hoist` binary

pub mod reporter;
pub mod terminal;
pub mod theme;

pub use reporter::ConsoleReporter;
pub use terminal::detect_capabilities;
