use lazy_static::lazy_static;
use mut_static::MutStatic;
use num_bigint::{BigInt, ToBigInt};
use num_cpus;
use crate::RSA;

lazy_static! {
    pub static ref CONFIG_DEF: RSA = RSA {
        mode: String::from("generate"),
        key: String::from("key.txt"),
        id: String::from("self"),
        input: String::from("stdin"),
        output: String::from("stdout"),
        prime_min: 41,
        prime_max: 51,
        sep_min: 5,
        sep_max: 10,
        rounds: 10,
        threads: num_cpus::get(),
        silent: false,
    };
    pub static ref PUBLIC_EXPONENT: BigInt = 65537.to_bigint().unwrap();
    pub static ref SILENT: MutStatic<bool> = MutStatic::new();
}

// unset means "not running as the CLI", so stay quiet
pub fn silent() -> bool {
    SILENT.read().map(|flag| *flag).unwrap_or(true)
}
