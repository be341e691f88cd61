mod comment;
mod operation_result;
pub mod validators;

pub use comment::*;
pub use operation_result::*;
