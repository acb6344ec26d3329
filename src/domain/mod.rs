mod format;
mod layout;
mod query;
mod temporal;
mod types;

pub use format::*;
pub use layout::*;
pub use query::*;
pub use temporal::*;
pub use types::*;
