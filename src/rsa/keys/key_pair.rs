use crate::rsa::keys::{parse_key_text, render_key_text, KeyError, PrivateKey, PublicKey};

#[derive(Debug, Clone, PartialEq)]
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}

impl KeyPair {
    pub fn from_key_text(text: &str) -> Result<Self, KeyError> {
        let (private, publics) = parse_key_text(text)?;
        let public = publics
            .into_iter()
            .find(|key| key.id == "self")
            .ok_or_else(|| KeyError::UnknownId(String::from("self")))?;
        if public.key.modulus != private.key.modulus {
            return Err(KeyError::ModulusMismatch);
        }
        Ok(KeyPair { public, private })
    }

    pub fn to_key_text(&self) -> String {
        render_key_text(&self.private, std::slice::from_ref(&self.public))
    }
}
