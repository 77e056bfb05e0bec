pub mod lower;
pub mod program;

pub mod prelude {
    pub use super::{lower::*, program::*};
}
