// src/common/validation.rs
//
// Regras customizadas usadas pelos `#[validate(custom(...))]` dos payloads.

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

/// CEP no formato `00000-000` ou `00000000`.
pub static CEP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}-?\d{3}$").expect("regex de CEP inválida"));

fn rejected(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

pub fn validate_future_date(date: &DateTime<Utc>) -> Result<(), ValidationError> {
    if *date >= Utc::now() {
        Ok(())
    } else {
        Err(rejected("past_date", "A data da mudança não pode estar no passado."))
    }
}

pub fn validate_positive_value(value: &Decimal) -> Result<(), ValidationError> {
    if *value > Decimal::ZERO {
        Ok(())
    } else {
        Err(rejected("non_positive", "O valor deve ser maior que zero."))
    }
}
