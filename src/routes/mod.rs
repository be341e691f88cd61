mod comments;
mod health_check;
mod helpers;

pub use comments::*;
pub use health_check::*;
pub use helpers::*;
