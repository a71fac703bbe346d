mod category;
mod path_entry;

pub use category::{Category, NewCategory};
pub use path_entry::PathEntry;
