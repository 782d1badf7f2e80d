// src/middleware/personnel.rs

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    common::error::AppError,
    config::{AppConfig, AppState},
    models::session::SessionContext,
};

// Header com o vendedor para o qual o operador trocou
pub const PERSONNEL_HEADER: &str = "x-personnel";

/// Vendedor ativo da requisição. O header é lido como UTF-8 para que nomes
/// como "Priyā" passem; bytes inválidos são rejeitados, nunca trocados pelo
/// padrão.
pub fn personnel_from_parts(parts: &Parts, config: &AppConfig) -> Result<String, AppError> {
    let Some(value) = parts.headers.get(PERSONNEL_HEADER) else {
        return Ok(config.default_personnel.clone());
    };

    let name = std::str::from_utf8(value.as_bytes())
        .map_err(|_| AppError::UnknownPersonnel(String::from_utf8_lossy(value.as_bytes()).into_owned()))?
        .trim();

    if name.is_empty() {
        return Ok(config.default_personnel.clone());
    }
    if !config.is_known_personnel(name) {
        return Err(AppError::UnknownPersonnel(name.to_string()));
    }
    Ok(name.to_string())
}

/// Monta a sessão da requisição: vendedor ativo e o horário atual em IST.
impl FromRequestParts<AppState> for SessionContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let personnel = personnel_from_parts(parts, &state.config)?;
        Ok(SessionContext::starting_now(personnel))
    }
}
