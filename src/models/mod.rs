pub mod repository;
pub mod outcome;
pub mod issue;

pub use repository::*;
pub use outcome::*;
pub use issue::*;
