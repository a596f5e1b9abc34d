// Dashboard widgets. Each module exposes a `render(frame, area, state)`
// entry point plus pure helpers that carry the unit tests.

pub mod board;
pub mod help_bar;
pub mod status_bar;
pub mod unmatched;
