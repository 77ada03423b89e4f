pub mod checks;
pub mod output;
pub mod util;

pub use checks::*;
pub use output::*;
pub use util::*;
