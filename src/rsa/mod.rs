use std::error::Error;
use std::{fs, io};
use std::io::{Read, Write};
use num::Integer;
use clap::Parser;
use num_bigint::{BigInt, ToBigInt};
use num_traits::{One, Signed, Zero};
use rand::Rng;

pub mod config;
pub mod prime_gen;
pub mod keys;
pub mod codec;

use config::*;
use keys::*;

#[derive(Debug, Clone)]
pub enum RunMode {
    Generate,
    Encode,
    Decode,
    Test,
}

#[macro_export]
macro_rules! rsa_args {
    ($CONFIG: expr, $NAME: ident) => {
#[derive(Debug, Parser)]
pub struct $NAME {
    #[clap(short, long, value_parser, default_value = $CONFIG.mode.as_str(), help = "Run mode")]
    pub mode: String,
    #[clap(short, long, value_parser, default_value = $CONFIG.key.as_str(), help = "Key text file path")]
    pub key: String,
    #[clap(long, value_parser, default_value = $CONFIG.id.as_str(), help = "Public key id to encode with")]
    pub id: String,
    #[clap(short, long, value_parser, default_value = $CONFIG.input.as_str(), help = "Input filename")]
    pub input: String,
    #[clap(short, long, value_parser, default_value = $CONFIG.output.as_str(), help = "Output filename")]
    pub output: String,
    #[clap(long, value_parser, default_value_t = $CONFIG.prime_min, help = "Min bit length of the first prime")]
    pub prime_min: u32,
    #[clap(long, value_parser, default_value_t = $CONFIG.prime_max, help = "Max bit length of the first prime")]
    pub prime_max: u32,
    #[clap(long, value_parser, default_value_t = $CONFIG.sep_min, help = "Min bit length separation between primes")]
    pub sep_min: u32,
    #[clap(long, value_parser, default_value_t = $CONFIG.sep_max, help = "Max bit length separation between primes")]
    pub sep_max: u32,
    #[clap(short, long, value_parser, default_value_t = $CONFIG.rounds, help = "Miller Rabin calculate rounds")]
    pub rounds: u32,
    #[clap(short, long, value_parser, default_value_t = $CONFIG.threads, help = "Calculate in <THREADS> threads")]
    pub threads: usize,
    #[clap(short, long, value_parser, default_value_t = $CONFIG.silent, help = "Disable log output")]
    pub silent: bool,
}
    };
}

rsa_args!(CONFIG_DEF, RSA);

impl RSA {
    pub fn get(&self) -> &RSA {
        self
    }

    fn run_mode(&self) -> Result<RunMode, Box<dyn Error>> {
        match self.mode.as_str() {
            "generate" => Ok(RunMode::Generate),
            "encode" => Ok(RunMode::Encode),
            "decode" => Ok(RunMode::Decode),
            "test" => Ok(RunMode::Test),
            _ => Err("Unknown run mode! available: generate(default), encode, decode, test".into()),
        }
    }

    pub fn read_input(&self) -> io::Result<String> {
        match self.input.as_str() {
            "stdin" => {
                let mut text = String::new();
                io::stdin().read_to_string(&mut text)?;
                Ok(text)
            }
            f => fs::read_to_string(f),
        }
    }

    pub fn write_output(&self, text: &str) -> io::Result<()> {
        match self.output.as_str() {
            "stdout" => {
                let mut out = io::stdout();
                out.write_all(text.as_bytes())?;
                out.write_all(b"\n")?;
                out.flush()
            }
            f => fs::write(f, text),
        }
    }

    pub fn reduced_totient(p: &BigInt, q: &BigInt) -> BigInt {
        let p_minus_one = p - 1.to_bigint().unwrap();
        let q_minus_one = q - 1.to_bigint().unwrap();
        (&p_minus_one * &q_minus_one) / p_minus_one.gcd(&q_minus_one)
    }

    // iterative extended Euclid on (totient, e), tracking the Bezout
    // t-coefficients; the run is only trusted when the reconstructed final
    // remainder lands exactly on the totient, i.e. gcd(e, totient) == 1
    pub fn invert_public_exponent(totient: &BigInt) -> Option<BigInt> {
        let mut r1 = totient.clone();
        let mut t1 = BigInt::zero();
        let mut r2 = PUBLIC_EXPONENT.clone();
        let mut t2 = BigInt::one();
        let mut q = &r1 / &r2;
        let mut r3 = &r1 % &r2;
        let mut t3 = &t1 - &q * &t2;
        while !r3.is_zero() {
            r1 = r2;
            t1 = t2;
            r2 = r3;
            t2 = t3;
            q = &r1 / &r2;
            r3 = &r1 % &r2;
            t3 = &t1 - &q * &t2;
        }
        if &t3 != totient {
            return None;
        }
        if t2.is_negative() { Some(totient + t2) } else { Some(t2) }
    }

    fn draw_bit_lengths(&self) -> (u32, u32) {
        let mut rng = rand::thread_rng();
        let bits_p = rng.gen_range(self.prime_min..=self.prime_max);
        let bits_q = bits_p + rng.gen_range(self.sep_min..=self.sep_max);
        (bits_p, bits_q)
    }

    // a probabilistic primality pass can hand back composites; every attempt
    // is accepted whole or thrown away whole
    pub fn generate_key(&self) -> KeyPair {
        loop {
            let (bits_p, bits_q) = self.draw_bit_lengths();
            let p = self.generate_prime(bits_p);
            let q = self.generate_prime(bits_q);
            let modulus = &p * &q;
            let totient = RSA::reduced_totient(&p, &q);
            if let Some(d) = RSA::invert_public_exponent(&totient) {
                return KeyPair {
                    public: PublicKey::new(modulus.clone(), PUBLIC_EXPONENT.clone(), "self"),
                    private: PrivateKey::new(modulus, d),
                };
            }
            if !self.silent {
                println!("public exponent not invertible for the drawn primes, regenerating");
            }
        }
    }

    pub fn run(&mut self) -> Result<(), Box<dyn Error>> {
        match self.run_mode()? {
            RunMode::Generate => {
                let pair = self.generate_key();
                if !self.silent { println!("generated key pair: {:?}", pair); }
                // a fresh pair replaces only our own lines, stored peer keys survive
                let mut publics = match fs::read_to_string(&self.key) {
                    Ok(text) => match parse_key_text(&text) {
                        Ok((_, publics)) => publics.into_iter().filter(|key| key.id != "self").collect(),
                        Err(_) => Vec::new(),
                    },
                    Err(_) => Vec::new(),
                };
                publics.insert(0, pair.public.clone());
                fs::write(&self.key, render_key_text(&pair.private, &publics))?;
                if !self.silent { println!("wrote key file: {}", self.key); }
            }
            RunMode::Encode => {
                let plain_text = self.read_input()?;
                let (_, publics) = parse_key_text(&fs::read_to_string(&self.key)?)?;
                let key = publics
                    .iter()
                    .find(|key| key.id == self.id)
                    .ok_or_else(|| KeyError::UnknownId(self.id.clone()))?;
                let cipher_text = RSA::encode(key, &plain_text, self.threads, self.silent)?;
                self.write_output(&cipher_text)?;
                if !self.silent { println!("Done"); }
            }
            RunMode::Decode => {
                let cipher_text = self.read_input()?;
                let (private, _) = parse_key_text(&fs::read_to_string(&self.key)?)?;
                let plain_text = RSA::decode(&private, cipher_text.trim(), self.threads, self.silent)?;
                self.write_output(&plain_text)?;
                if !self.silent { println!("Done"); }
            }
            RunMode::Test => {
                let pair = self.generate_key();
                if !self.silent { println!("generated key pair: {:?}", pair); }
                let plain_text = match self.input.as_str() {
                    "stdin" => String::from("The quick brown fox jumps over the lazy dog. 0123456789"),
                    f => fs::read_to_string(f)?,
                };
                let cipher_text = RSA::encode(&pair.public, &plain_text, self.threads, self.silent)?;
                let decoded = RSA::decode(&pair.private, &cipher_text, self.threads, self.silent)?;
                assert_eq!(plain_text, decoded);
                if !self.silent { println!("Test pass"); }
            }
        }
        Ok(())
    }
}
