//! Terminal styling and aligned layout for cmdtree help output.
//!
//! This crate knows nothing about the command tree. It styles strings and
//! aligns plain `(term, description)` rows; the engine crate assembles help
//! sections and feeds them through [`Styler`] and [`two_column`].

mod layout;
mod style;

pub use layout::two_column;
pub use style::{ColorMode, Styler, is_enabled};
