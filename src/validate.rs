//! Create-request validation.
//!
//! Checks run in a fixed order and the first failure wins. Clients match on
//! the error text, so the order is part of the contract:
//!
//! 1. every required field present and non-blank
//! 2. `state` is two characters
//! 3. `zip` renders as five characters
//! 4. `zip` is a JSON number made of digits only
//!
//! Step 3 runs before step 4, so a five-character string zip such as
//! `"abcde"` is reported as a type error while `"abc"` is reported as a
//! length error.

use thiserror::Error;

use crate::address::{Address, NewAddress, Zip, ZipInput};

const STATE_LEN: usize = 2;
const ZIP_LEN: usize = 5;

/// Why a candidate address was rejected.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ValidationError {
    #[error("Please enter all required fields")]
    MissingRequiredField,
    #[error("State must be abbreviated to 2 characters")]
    InvalidStateLength,
    #[error("Your zipcode is {zip}, your zipcode length is {len}")]
    InvalidZipLength { zip: String, len: usize },
    #[error("Zip must be a number")]
    InvalidZipType,
}

/// Turns an untrusted [`NewAddress`] into an [`Address`] fit for the store.
///
/// `address2` is passed through untouched.
pub fn validate(candidate: NewAddress) -> Result<Address, ValidationError> {
    let NewAddress { first_name, last_name, address1, address2, city, state, zip } = candidate;

    let (Some(first_name), Some(last_name), Some(address1), Some(city), Some(state), Some(zip)) = (
        filled(first_name),
        filled(last_name),
        filled(address1),
        filled(city),
        filled(state),
        zip.filter(|z| !z.is_blank()),
    ) else {
        return Err(ValidationError::MissingRequiredField);
    };

    if state.chars().count() != STATE_LEN {
        return Err(ValidationError::InvalidStateLength);
    }

    let zip = parse_zip(&zip)?;

    Ok(Address { first_name, last_name, address1, address2, city, state, zip })
}

fn filled(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

fn parse_zip(zip: &ZipInput) -> Result<Zip, ValidationError> {
    let text = zip.to_string();
    let len = text.chars().count();
    if len != ZIP_LEN {
        return Err(ValidationError::InvalidZipLength { zip: text, len });
    }

    match zip {
        ZipInput::Number(_) if text.bytes().all(|b| b.is_ascii_digit()) => text
            .parse::<u32>()
            .map(Zip::new)
            .map_err(|_| ValidationError::InvalidZipType),
        _ => Err(ValidationError::InvalidZipType),
    }
}
