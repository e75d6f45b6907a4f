use std::sync::mpsc;
use std::thread;
use chrono::Local;
use num_bigint::{BigInt, BigUint, RandBigInt, ToBigInt, ToBigUint};
use num_traits::*;
use crate::rsa::config::silent;
use crate::RSA;

impl RSA {
    pub fn fast_modular_exponent(mut a: BigInt, mut q: BigInt, n: BigInt) -> BigInt {
        let mut r: BigInt = One::one();
        a %= &n;
        while !q.is_zero() {
            if q.bit(0) { r = (r * &a) % &n; }
            q >>= 1;
            a = (&a * &a) % &n;
        }
        r
    }

    pub fn miller_rabin(n: &BigInt, rounds: u32) -> bool {
        let two = 2.to_bigint().unwrap();
        if *n < two { return false; }
        if !n.bit(0) { return *n == two; }
        let n_minus_one = n - 1.to_bigint().unwrap();
        let mut d = n_minus_one.clone();
        let mut s = 0u32;
        while !d.bit(0) {
            d >>= 1;
            s += 1;
        }
        let mut rng = rand::thread_rng();
        let witness_range = (n - &two).to_biguint().unwrap();
        'witness: for _ in 0..rounds {
            let a = rng.gen_biguint_range(&BigUint::zero(), &witness_range).to_bigint().unwrap() + &two;
            let mut x = RSA::fast_modular_exponent(a, d.clone(), n.clone());
            if x.is_one() || x == n_minus_one { continue; }
            for _ in 1..s {
                x = (&x * &x) % n;
                if x == n_minus_one { continue 'witness; }
            }
            return false;
        }
        true
    }

    // races `threads` identical searches, first probable prime wins
    pub fn generate_prime(&self, bits: u32) -> BigInt {
        let t = self.threads.max(1);
        let (tx, rx) = mpsc::channel();
        let handles = (0..t).map(|_| {
            let tx = tx.clone();
            let (bits, rounds) = (bits, self.rounds);
            thread::spawn(move || {
                let _ = tx.send(RSA::generate_one_prime(bits, rounds));
            })
        }).collect::<Vec<_>>();
        let prime = rx.recv().unwrap();
        for handle in handles { handle.join().unwrap(); }
        prime
    }

    pub fn generate_one_prime(bits: u32, rounds: u32) -> BigInt {
        let mut rng = rand::thread_rng();
        let low = 2.to_biguint().unwrap().pow(bits - 1);
        let high = 2.to_biguint().unwrap().pow(bits);
        let start = Local::now().timestamp_millis();
        let mut tries = 0u64;
        loop {
            tries += 1;
            let candidate = (rng.gen_biguint_range(&low, &high) | BigUint::one()).to_bigint().unwrap();
            if RSA::miller_rabin(&candidate, rounds) {
                if !silent() {
                    println!("found {}-bit probable prime in {} tries after {} ms",
                             bits, tries, Local::now().timestamp_millis() - start);
                }
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::ToBigInt;
    use crate::rsa::config::CONFIG_DEF;
    use crate::RSA;

    #[test]
    fn test_miller_rabin_known_values() {
        for prime in [2i64, 3, 5, 13, 149, 151, 65537, 4294967291] {
            assert!(RSA::miller_rabin(&prime.to_bigint().unwrap(), 20), "{} is prime", prime);
        }
        for composite in [0i64, 1, 4, 9, 561, 65535, 4294967295] {
            assert!(!RSA::miller_rabin(&composite.to_bigint().unwrap(), 20), "{} is composite", composite);
        }
    }

    #[test]
    fn test_fast_modular_exponent() {
        let result = RSA::fast_modular_exponent(
            65.to_bigint().unwrap(), 7.to_bigint().unwrap(), 22499.to_bigint().unwrap());
        assert_eq!(result, 22103.to_bigint().unwrap());
        let identity = RSA::fast_modular_exponent(
            0.to_bigint().unwrap(), 65537.to_bigint().unwrap(), 22499.to_bigint().unwrap());
        assert_eq!(identity, 0.to_bigint().unwrap());
    }

    #[test]
    fn test_generated_prime_has_exact_bit_length() {
        let r = CONFIG_DEF.get();
        for bits in [41u32, 46, 51] {
            let prime = r.generate_prime(bits);
            assert_eq!(prime.bits(), bits as u64);
            assert!(RSA::miller_rabin(&prime, 20));
        }
    }
}
