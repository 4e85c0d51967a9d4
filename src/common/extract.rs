// src/common/extract.rs

use std::borrow::Cow;

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::common::error::AppError;

// Corpo JSON já desserializado e validado.
// Qualquer falha (JSON malformado, campo faltando, tipo errado, regra do
// validator) sai como `AppError::ValidationError`, ou seja, 400 com detalhes.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| json_rejection("body", rejection))?;

        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Converte a rejeição do extrator `Json` num erro de validação do campo `field`.
pub fn json_rejection(field: &'static str, rejection: JsonRejection) -> AppError {
    tracing::debug!("corpo JSON rejeitado: {}", rejection);

    let mut errors = ValidationErrors::new();
    errors.add(
        field,
        ValidationError::new("invalid_body").with_message(Cow::Owned(rejection.body_text())),
    );
    AppError::ValidationError(errors)
}
