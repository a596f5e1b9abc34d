// Name-matching core: normalization, record linkage, and unmatched
// reporting. No network, file, or display calls live in this module; it
// accepts in-memory tables and an alias table and emits a joined table
// plus an unmatched list.

pub mod linker;
pub mod normalize;
pub mod unmatched;

pub use linker::{link, mark_drafted, LinkOutcome, LinkedPlayer};
pub use normalize::{normalize, AliasTable, NormalizedKey};
pub use unmatched::report;
