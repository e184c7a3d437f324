//! Terminal output: crossterm-backed sink and view for command-line tools.

mod console;
mod output;

pub use console::{fit_width, ConsoleSink, ConsoleView};
pub use output::OutputBuffer;
