use std::fmt::{Display, Formatter};
use crate::rsa::keys::{PrivateKey, PublicKey};

impl Display for PrivateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.key.modulus, self.key.exponent)
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{},{}", self.id, self.key.modulus, self.key.exponent)
    }
}

pub fn render_key_text(private: &PrivateKey, publics: &[PublicKey]) -> String {
    let mut lines = vec![private.to_string()];
    lines.extend(publics.iter().map(PublicKey::to_string));
    lines.join("\n") + "\n"
}
