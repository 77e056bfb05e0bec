pub mod error;
pub mod input;
pub mod runtime;

pub mod prelude {
    pub use super::{error::*, input::*, runtime::*};
}

#[cfg(test)]
mod tests;
