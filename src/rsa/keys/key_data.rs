use num_bigint::BigInt;
use crate::rsa::keys::Key;

#[derive(Debug, Clone, PartialEq)]
pub struct PublicKey {
    pub key: Key,
    pub id: String,
}

impl PublicKey {
    pub fn new(modulus: BigInt, exponent: BigInt, id: &str) -> Self {
        Self { key: Key::new(modulus, exponent), id: id.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrivateKey {
    pub key: Key,
}

impl PrivateKey {
    pub fn new(modulus: BigInt, exponent: BigInt) -> Self {
        Self { key: Key::new(modulus, exponent) }
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::ToBigInt;
    use super::*;

    #[test]
    fn test_digit_length() {
        let key = PrivateKey::new(22499.to_bigint().unwrap(), 6343.to_bigint().unwrap());
        assert_eq!(key.key.digit_length(), 5);
        let key = PublicKey::new(3233.to_bigint().unwrap(), 17.to_bigint().unwrap(), "self");
        assert_eq!(key.key.digit_length(), 4);
    }
}
