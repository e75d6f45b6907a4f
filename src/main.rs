mod rsa;

pub use crate::rsa::*;
pub use crate::rsa::config::SILENT;
pub use crate::RSA;

use std::error::Error;
use clap::Parser;

fn main() -> Result<(), Box<dyn Error>> {
    let mut rsa = RSA::parse();
    // cipher or plain text going to stdout must stay clean of diagnostics
    if rsa.output == "stdout" && (rsa.mode == "encode" || rsa.mode == "decode") {
        rsa.silent = true;
    }
    if !SILENT.is_set().unwrap() { SILENT.set(rsa.silent).unwrap(); }
    if !rsa.silent { println!("Run args: {:?}", rsa); }
    rsa.run()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use num::Integer;
    use num_bigint::ToBigInt;
    use num_traits::One;
    use crate::rsa::config::{CONFIG_DEF, PUBLIC_EXPONENT};
    use crate::RSA;

    #[test]
    fn test_invert_public_exponent() {
        // lambda(61 * 53) = lcm(60, 52)
        let totient = 780.to_bigint().unwrap();
        let d = RSA::invert_public_exponent(&totient).unwrap();
        assert!(d > 0.to_bigint().unwrap() && d < totient);
        assert!(((&d * &*PUBLIC_EXPONENT) % &totient).is_one());
    }

    #[test]
    fn test_invert_rejects_shared_factor() {
        // a totient divisible by e stands in for a bad primality draw
        let totient = &*PUBLIC_EXPONENT * 6.to_bigint().unwrap();
        assert!(RSA::invert_public_exponent(&totient).is_none());
    }

    #[test]
    fn test_reduced_totient() {
        let totient = RSA::reduced_totient(&61.to_bigint().unwrap(), &53.to_bigint().unwrap());
        assert_eq!(totient, 780.to_bigint().unwrap());
        let totient = RSA::reduced_totient(&149.to_bigint().unwrap(), &151.to_bigint().unwrap());
        assert_eq!(totient, 11100.to_bigint().unwrap());
    }

    #[test]
    fn test_exponentiation_inverts_for_every_residue() {
        // small enough to sweep the whole ring
        let n = 3233.to_bigint().unwrap();
        let totient = 780.to_bigint().unwrap();
        let d = RSA::invert_public_exponent(&totient).unwrap();
        let mut m = 0.to_bigint().unwrap();
        while m < n {
            let c = RSA::fast_modular_exponent(m.clone(), PUBLIC_EXPONENT.clone(), n.clone());
            let back = RSA::fast_modular_exponent(c, d.clone(), n.clone());
            assert_eq!(back, m);
            m += 1.to_bigint().unwrap();
        }
    }

    #[test]
    fn test_generated_pair_round_trips() -> Result<(), Box<dyn Error>> {
        let r = CONFIG_DEF.get();
        let pair = r.generate_key();
        assert_eq!(pair.public.key.modulus, pair.private.key.modulus);
        assert_eq!(pair.public.id, "self");
        let plain = "Lorem ipsum dolor sit amet,\nwith a λ and a tab\tthrown in.";
        let cipher = RSA::encode(&pair.public, plain, 1, true)?;
        assert_eq!(cipher.len() % pair.public.key.digit_length(), 0);
        assert_eq!(RSA::decode(&pair.private, &cipher, 1, true)?, plain);
        Ok(())
    }

    #[test]
    fn test_generated_pair_satisfies_rsa_invariant() {
        let r = CONFIG_DEF.get();
        let pair = r.generate_key();
        let n = &pair.public.key.modulus;
        // p in [41, 51] bits, q offset by [5, 10] more
        assert!(n.bits() >= 86 && n.bits() <= 112);
        for m in [0i64, 1, 2, 65, 9999, 123456789] {
            let m = m.to_bigint().unwrap();
            let c = RSA::fast_modular_exponent(m.clone(), pair.public.key.exponent.clone(), n.clone());
            let back = RSA::fast_modular_exponent(c, pair.private.key.exponent.clone(), n.clone());
            assert_eq!(back, m);
        }
    }

    #[test]
    fn test_key_pair_survives_key_text() -> Result<(), Box<dyn Error>> {
        let r = CONFIG_DEF.get();
        let pair = r.generate_key();
        let reloaded = crate::rsa::keys::KeyPair::from_key_text(&pair.to_key_text())?;
        assert_eq!(reloaded, pair);
        let plain = "round trip through the stored form";
        let cipher = RSA::encode(&reloaded.public, plain, 1, true)?;
        assert_eq!(RSA::decode(&reloaded.private, &cipher, 1, true)?, plain);
        Ok(())
    }

    #[test]
    fn test_gcd_of_exponent_and_small_totients() {
        // e is prime, so any non-coprime totient must be a multiple of it
        for k in 1..10 {
            let totient = &*PUBLIC_EXPONENT * k.to_bigint().unwrap();
            assert_eq!(totient.gcd(&PUBLIC_EXPONENT), PUBLIC_EXPONENT.clone());
            assert!(RSA::invert_public_exponent(&totient).is_none());
        }
    }
}
