pub mod key_writer;
pub mod key_reader;
pub mod key_data;
pub mod key_pair;

pub use key_pair::*;
pub use key_reader::*;
pub use key_writer::*;
pub use key_data::*;

use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use num_bigint::BigInt;

#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    pub modulus: BigInt,
    pub exponent: BigInt,
}

impl Key {
    pub fn new(modulus: BigInt, exponent: BigInt) -> Self {
        Self { modulus, exponent }
    }

    // every codec width derives from this count
    pub fn digit_length(&self) -> usize {
        self.modulus.to_string().len()
    }
}

pub enum KeyError {
    ParseError(String),
    FormatError,
    UnknownId(String),
    ModulusMismatch,
}

impl KeyError {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyError::ParseError(text) => write!(f, "not a positive decimal key value: {:?}", text),
            KeyError::FormatError => write!(f, "malformed key text"),
            KeyError::UnknownId(id) => write!(f, "no stored public key with id {:?}", id),
            KeyError::ModulusMismatch => write!(f, "public and private key moduli differ"),
        }
    }
}

impl Display for KeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.display(f)
    }
}

impl Debug for KeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.display(f)
    }
}

impl Error for KeyError {}
