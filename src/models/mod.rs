pub mod options;
pub mod response;

pub use options::*;
pub use response::*;
