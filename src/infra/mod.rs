mod extract;
mod fetch;
mod open;

pub use extract::*;
pub use fetch::*;
pub use open::*;
