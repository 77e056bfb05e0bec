pub mod lexer;
pub mod token;

pub mod prelude {
    pub use super::{lexer::*, token::*};
}

#[cfg(test)]
mod tests;
