use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::thread;
use crossbeam_channel::bounded;
use indicatif::{ProgressBar, ProgressStyle};
use num_bigint::BigInt;
use crate::rsa::keys::{PrivateKey, PublicKey};
use crate::RSA;

// decimal digits reserved per character code point
pub const NUMERIC_CHAR_WIDTH: usize = 4;

pub enum CodecError {
    CharOutOfRange(char),
    InvalidUnit(String),
    CipherLength { length: usize, unit_width: usize },
    Misaligned(usize),
    ModulusTooSmall,
}

impl CodecError {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::CharOutOfRange(character) => {
                write!(f, "character {:?} needs more than {} decimal digits", character, NUMERIC_CHAR_WIDTH)
            }
            CodecError::InvalidUnit(unit) => write!(f, "not a decimal numeric unit: {:?}", unit),
            CodecError::CipherLength { length, unit_width } => {
                write!(f, "cipher text length {} is not a multiple of the unit width {}", length, unit_width)
            }
            CodecError::Misaligned(length) => {
                write!(f, "numeric text length {} is not a multiple of {}", length, NUMERIC_CHAR_WIDTH)
            }
            CodecError::ModulusTooSmall => write!(f, "modulus is too small to carry numeric units"),
        }
    }
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.display(f)
    }
}

impl Debug for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.display(f)
    }
}

impl Error for CodecError {}

impl RSA {
    pub fn encode(key: &PublicKey, plain_text: &str, threads: usize, silent: bool) -> Result<String, CodecError> {
        if plain_text.is_empty() { return Ok(String::new()); }
        let cipher_width = key.key.digit_length();
        if cipher_width < 2 { return Err(CodecError::ModulusTooSmall); }
        let numeric_text = RSA::plain_to_numeric(plain_text)?;
        // one digit narrower than the modulus keeps every unit value below it
        let units = RSA::break_into_units(&numeric_text, cipher_width - 1);
        let encrypted = RSA::transform_units(units, &key.key.exponent, &key.key.modulus, threads, silent)?;
        Ok(encrypted.iter().map(|unit| RSA::fill_unit(unit, cipher_width)).collect())
    }

    pub fn decode(key: &PrivateKey, cipher_text: &str, threads: usize, silent: bool) -> Result<String, CodecError> {
        if cipher_text.is_empty() { return Ok(String::new()); }
        let cipher_width = key.key.digit_length();
        if cipher_width < 2 { return Err(CodecError::ModulusTooSmall); }
        if cipher_text.len() % cipher_width != 0 {
            return Err(CodecError::CipherLength { length: cipher_text.len(), unit_width: cipher_width });
        }
        let units = RSA::break_into_units(cipher_text, cipher_width);
        let decrypted = RSA::transform_units(units, &key.key.exponent, &key.key.modulus, threads, silent)?;
        let numeric_text = RSA::repair_numeric_units(decrypted, cipher_width - 1);
        RSA::numeric_to_plain(&numeric_text)
    }

    fn plain_to_numeric(plain_text: &str) -> Result<String, CodecError> {
        let mut numeric_text = String::with_capacity(plain_text.len() * NUMERIC_CHAR_WIDTH);
        for character in plain_text.chars() {
            let code = character as u32;
            if code > 9999 {
                return Err(CodecError::CharOutOfRange(character));
            }
            numeric_text.push_str(&format!("{:04}", code));
        }
        Ok(numeric_text)
    }

    fn numeric_to_plain(numeric_text: &str) -> Result<String, CodecError> {
        if numeric_text.len() % NUMERIC_CHAR_WIDTH != 0 {
            return Err(CodecError::Misaligned(numeric_text.len()));
        }
        RSA::break_into_units(numeric_text, NUMERIC_CHAR_WIDTH)
            .iter()
            .map(|unit| {
                let code: u32 = unit.parse().map_err(|_| CodecError::InvalidUnit(unit.clone()))?;
                char::from_u32(code).ok_or_else(|| CodecError::InvalidUnit(unit.clone()))
            })
            .collect()
    }

    fn break_into_units(text: &str, unit_width: usize) -> Vec<String> {
        text.as_bytes()
            .chunks(unit_width)
            .map(|unit| String::from_utf8_lossy(unit).into_owned())
            .collect()
    }

    fn fill_unit(unit: &str, unit_width: usize) -> String {
        format!("{:0>width$}", unit, width = unit_width)
    }

    // undoes the leading-zero loss of decimal rendering: every unit but the
    // last was exactly `unit_width` digits wide before encryption, and the
    // last one ended on a whole-character boundary
    fn repair_numeric_units(mut units: Vec<String>, unit_width: usize) -> String {
        let last = units.len() - 1;
        let raw_last_length = units[last].len();
        for unit in units.iter_mut() {
            *unit = RSA::fill_unit(unit, unit_width);
        }
        let mut total_length = last * unit_width + raw_last_length;
        let mut target_length = raw_last_length;
        while total_length % NUMERIC_CHAR_WIDTH != 0 {
            total_length += 1;
            target_length += 1;
        }
        let start = units[last].len().saturating_sub(target_length);
        let repaired = units[last][start..].to_string();
        units[last] = repaired;
        units.concat()
    }

    fn transform_units(units: Vec<String>, exponent: &BigInt, modulus: &BigInt,
                       threads: usize, silent: bool) -> Result<Vec<String>, CodecError> {
        let values = units
            .iter()
            .map(|unit| {
                if unit.is_empty() || !unit.bytes().all(|digit| digit.is_ascii_digit()) {
                    return Err(CodecError::InvalidUnit(unit.clone()));
                }
                BigInt::parse_bytes(unit.as_bytes(), 10).ok_or_else(|| CodecError::InvalidUnit(unit.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if threads <= 1 || values.len() < 2 {
            return Ok(values
                .into_iter()
                .map(|value| RSA::fast_modular_exponent(value, exponent.clone(), modulus.clone()).to_string())
                .collect());
        }
        let total = values.len();
        let (unit_tx, unit_rx) = bounded::<(usize, BigInt)>(threads);
        let (result_tx, result_rx) = bounded::<(usize, String)>(threads);
        let workers = (0..threads).map(|_| {
            let rx = unit_rx.clone();
            let tx = result_tx.clone();
            let (exponent, modulus) = (exponent.clone(), modulus.clone());
            thread::spawn(move || {
                while let Ok((index, value)) = rx.recv() {
                    let result = RSA::fast_modular_exponent(value, exponent.clone(), modulus.clone());
                    if tx.send((index, result.to_string())).is_err() { break; }
                }
            })
        }).collect::<Vec<_>>();
        drop(result_tx);
        let progress = match silent {
            true => None,
            false => Some(ProgressBar::new(total as u64)),
        };
        if let Some(progress) = &progress {
            progress.set_style(ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})").unwrap()
                .progress_chars("#>-"));
        }
        let mut collected = Vec::with_capacity(total);
        for (index, value) in values.into_iter().enumerate() {
            // drain opportunistically so neither bounded channel can fill up
            while let Ok(result) = result_rx.try_recv() {
                collected.push(result);
                if let Some(progress) = &progress { progress.inc(1); }
            }
            unit_tx.send((index, value)).unwrap();
        }
        drop(unit_tx);
        while collected.len() < total {
            collected.push(result_rx.recv().unwrap());
            if let Some(progress) = &progress { progress.inc(1); }
        }
        if let Some(progress) = &progress { progress.finish_and_clear(); }
        for worker in workers { worker.join().unwrap(); }
        collected.sort_by_key(|(index, _)| *index);
        Ok(collected.into_iter().map(|(_, unit)| unit).collect())
    }
}
