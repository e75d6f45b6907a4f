use std::str::FromStr;
use num_bigint::BigInt;
use num_traits::Signed;
use crate::rsa::keys::{Key, KeyError, PrivateKey, PublicKey};

fn parse_value(text: &str) -> Result<BigInt, KeyError> {
    let value = BigInt::parse_bytes(text.trim().as_bytes(), 10)
        .ok_or_else(|| KeyError::ParseError(text.to_string()))?;
    if !value.is_positive() {
        return Err(KeyError::ParseError(text.to_string()));
    }
    Ok(value)
}

fn parse_key_body(text: &str) -> Result<Key, KeyError> {
    let (modulus, exponent) = text.split_once(',').ok_or(KeyError::FormatError)?;
    Ok(Key::new(parse_value(modulus)?, parse_value(exponent)?))
}

impl FromStr for PrivateKey {
    type Err = KeyError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        Ok(PrivateKey { key: parse_key_body(line)? })
    }
}

impl FromStr for PublicKey {
    type Err = KeyError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (id, body) = line.split_once(':').ok_or(KeyError::FormatError)?;
        Ok(PublicKey { key: parse_key_body(body)?, id: id.to_string() })
    }
}

// key text layout: private key line first, one public key line per known peer
pub fn parse_key_text(text: &str) -> Result<(PrivateKey, Vec<PublicKey>), KeyError> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    let private: PrivateKey = lines.next().ok_or(KeyError::FormatError)?.parse()?;
    let publics = lines.map(str::parse).collect::<Result<Vec<PublicKey>, _>>()?;
    Ok((private, publics))
}
