// src/services/location_service.rs

use std::sync::Arc;

use crate::models::geo::{
    GeoReference, ResolvedLocation, OTHER_ZONE, PRINCIPAL_CITY, UNKNOWN_STATE,
};

pub const PINCODE_LEN: usize = 6;

/// Completa cidade/estado/zona a partir de dados parciais usando a referência
/// geográfica estática. Nunca falha: o que falta vira sentinela.
#[derive(Clone)]
pub struct LocationService {
    geo: Arc<GeoReference>,
}

/// Mantém só dígitos, no máximo seis, como o campo de pincode faz durante a
/// digitação.
pub fn sanitize_pincode(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit())
        .take(PINCODE_LEN)
        .collect()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl LocationService {
    pub fn new(geo: Arc<GeoReference>) -> Self {
        Self { geo }
    }

    pub fn reference(&self) -> &GeoReference {
        &self.geo
    }

    /// Pincode → (cidade, estado). Só códigos completos de seis dígitos são buscados.
    pub fn lookup_pincode(&self, raw: &str) -> Option<(&str, &str)> {
        let code = sanitize_pincode(raw);
        if code.len() != PINCODE_LEN {
            return None;
        }
        self.geo
            .pincode(&code)
            .map(|entry| (entry.city.as_str(), entry.state.as_str()))
    }

    /// Prioridade: pincode conhecido, estado informado, busca da cidade na
    /// tabela de referência e, por fim, as sentinelas.
    pub fn resolve(
        &self,
        city: Option<&str>,
        state: Option<&str>,
        pincode: Option<&str>,
    ) -> ResolvedLocation {
        let city = non_empty(city);
        let state = non_empty(state);

        let (city, state) = if let Some((pin_city, pin_state)) =
            pincode.and_then(|p| self.lookup_pincode(p))
        {
            (pin_city.to_string(), pin_state.to_string())
        } else if let Some(state) = state {
            (city.unwrap_or(PRINCIPAL_CITY).to_string(), state.to_string())
        } else if let Some(city) = city {
            let state = self
                .geo
                .state_for_city(city)
                .map(|entry| entry.state.as_str())
                .unwrap_or(UNKNOWN_STATE);
            (city.to_string(), state.to_string())
        } else {
            (PRINCIPAL_CITY.to_string(), UNKNOWN_STATE.to_string())
        };

        let zone = self.derive_zone(None, &state, &city);
        ResolvedLocation { city, state, zone }
    }

    /// Override primeiro, depois a zona do estado, depois a zona do estado que
    /// lista a cidade, por fim "Other".
    pub fn derive_zone(&self, zone_override: Option<&str>, state: &str, city: &str) -> String {
        if let Some(zone) = non_empty(zone_override) {
            return zone.to_string();
        }
        if let Some(entry) = self.geo.state(state) {
            return entry.zone.clone();
        }
        if let Some(entry) = non_empty(Some(city)).and_then(|c| self.geo.state_for_city(c)) {
            return entry.zone.clone();
        }
        OTHER_ZONE.to_string()
    }
}
