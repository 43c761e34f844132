mod lead;
mod submission;

pub use lead::*;
pub use submission::*;
