// src/models/geo.rs

use std::path::Path;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::common::error::AppError;

// --- SENTINELAS ---

pub const PRINCIPAL_CITY: &str = "Principal City";
pub const UNKNOWN_STATE: &str = "N/A";
pub const OTHER_ZONE: &str = "Other";

/// Um estado da tabela de referência. `cities` mantém a ordem configurada e é
/// comparada sem diferenciar maiúsculas.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeoEntry {
    #[schema(example = "Punjab")]
    pub state: String,
    #[schema(example = "North")]
    pub zone: String,
    #[schema(example = json!(["Ludhiana", "Amritsar"]))]
    pub cities: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PincodeEntry {
    #[schema(example = "110001")]
    pub pincode: String,
    #[schema(example = "New Delhi")]
    pub city: String,
    #[schema(example = "Delhi")]
    pub state: String,
}

/// Saída do resolvedor de localização.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLocation {
    pub city: String,
    pub state: String,
    pub zone: String,
}

/// Configuração geográfica estática: estados com zona e cidades, mais a
/// tabela de pincodes. Somente leitura depois de carregada.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoReference {
    pub states: Vec<GeoEntry>,
    #[serde(default)]
    pub pincodes: Vec<PincodeEntry>,
}

// (estado, zona, cidades)
const DEFAULT_STATES: &[(&str, &str, &[&str])] = &[
    ("Delhi", "North", &["New Delhi", "Delhi", "Dwarka", "Rohini"]),
    ("Punjab", "North", &["Ludhiana", "Amritsar", "Jalandhar", "Mohali", "Patiala"]),
    ("Haryana", "North", &["Gurugram", "Faridabad", "Panipat", "Ambala", "Karnal"]),
    ("Uttar Pradesh", "North", &["Noida", "Lucknow", "Kanpur", "Ghaziabad", "Agra", "Varanasi"]),
    ("Rajasthan", "North", &["Jaipur", "Jodhpur", "Udaipur", "Kota", "Bhiwadi"]),
    ("Himachal Pradesh", "North", &["Shimla", "Baddi", "Solan"]),
    ("Uttarakhand", "North", &["Dehradun", "Haridwar", "Rudrapur"]),
    ("Maharashtra", "West", &["Mumbai", "Pune", "Nagpur", "Nashik", "Aurangabad", "Thane"]),
    ("Gujarat", "West", &["Ahmedabad", "Surat", "Vadodara", "Rajkot", "Vapi"]),
    ("Goa", "West", &["Panaji", "Margao", "Vasco da Gama"]),
    ("Madhya Pradesh", "Central", &["Indore", "Bhopal", "Gwalior", "Jabalpur", "Pithampur"]),
    ("Chhattisgarh", "Central", &["Raipur", "Bhilai", "Bilaspur"]),
    ("Karnataka", "South", &["Bengaluru", "Mysuru", "Hubballi", "Mangaluru", "Belagavi"]),
    ("Tamil Nadu", "South", &["Chennai", "Coimbatore", "Madurai", "Hosur", "Tiruppur"]),
    ("Kerala", "South", &["Kochi", "Thiruvananthapuram", "Kozhikode"]),
    ("Telangana", "South", &["Hyderabad", "Warangal", "Secunderabad"]),
    ("Andhra Pradesh", "South", &["Visakhapatnam", "Vijayawada", "Tirupati", "Sri City"]),
    ("West Bengal", "East", &["Kolkata", "Howrah", "Durgapur", "Siliguri"]),
    ("Odisha", "East", &["Bhubaneswar", "Cuttack", "Rourkela"]),
    ("Bihar", "East", &["Patna", "Gaya", "Muzaffarpur"]),
    ("Jharkhand", "East", &["Ranchi", "Jamshedpur", "Dhanbad", "Bokaro"]),
    ("Assam", "North East", &["Guwahati", "Dibrugarh", "Silchar"]),
];

// (pincode, cidade, estado)
const DEFAULT_PINCODES: &[(&str, &str, &str)] = &[
    ("110001", "New Delhi", "Delhi"),
    ("141001", "Ludhiana", "Punjab"),
    ("122001", "Gurugram", "Haryana"),
    ("201301", "Noida", "Uttar Pradesh"),
    ("302001", "Jaipur", "Rajasthan"),
    ("400001", "Mumbai", "Maharashtra"),
    ("411001", "Pune", "Maharashtra"),
    ("380001", "Ahmedabad", "Gujarat"),
    ("395003", "Surat", "Gujarat"),
    ("452001", "Indore", "Madhya Pradesh"),
    ("560001", "Bengaluru", "Karnataka"),
    ("600001", "Chennai", "Tamil Nadu"),
    ("500001", "Hyderabad", "Telangana"),
    ("682001", "Kochi", "Kerala"),
    ("700001", "Kolkata", "West Bengal"),
    ("751001", "Bhubaneswar", "Odisha"),
    ("781001", "Guwahati", "Assam"),
];

impl GeoReference {
    /// Tabela embutida no binário, usada quando `GEO_CONFIG_PATH` não está
    /// configurado.
    pub fn builtin() -> Self {
        let states = DEFAULT_STATES
            .iter()
            .map(|(state, zone, cities)| GeoEntry {
                state: state.to_string(),
                zone: zone.to_string(),
                cities: cities.iter().map(|c| c.to_string()).collect(),
            })
            .collect();

        let pincodes = DEFAULT_PINCODES
            .iter()
            .map(|(pincode, city, state)| PincodeEntry {
                pincode: pincode.to_string(),
                city: city.to_string(),
                state: state.to_string(),
            })
            .collect();

        Self { states, pincodes }
    }

    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let reference: GeoReference = serde_json::from_str(raw)
            .map_err(|e| AppError::GeoConfig(e.to_string()))?;
        reference.check()?;
        Ok(reference)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| AppError::GeoConfig(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&raw)
    }

    // O nome do estado é a chave da tabela e deve ser único.
    fn check(&self) -> Result<(), AppError> {
        for (i, entry) in self.states.iter().enumerate() {
            if self.states[..i].iter().any(|prior| prior.state == entry.state) {
                return Err(AppError::GeoConfig(format!("duplicate state: {}", entry.state)));
            }
        }
        Ok(())
    }

    /// Busca exata (diferencia maiúsculas) pelo nome do estado.
    pub fn state(&self, state: &str) -> Option<&GeoEntry> {
        self.states.iter().find(|entry| entry.state == state)
    }

    /// Primeiro estado, na ordem da tabela, que lista `city` (sem diferenciar maiúsculas).
    pub fn state_for_city(&self, city: &str) -> Option<&GeoEntry> {
        let needle = city.to_lowercase();
        self.states
            .iter()
            .find(|entry| entry.cities.iter().any(|c| c.to_lowercase() == needle))
    }

    pub fn pincode(&self, code: &str) -> Option<&PincodeEntry> {
        self.pincodes.iter().find(|entry| entry.pincode == code)
    }

    /// Zonas distintas na ordem em que aparecem.
    pub fn zones(&self) -> Vec<&str> {
        let mut zones: Vec<&str> = Vec::new();
        for entry in &self.states {
            if !zones.contains(&entry.zone.as_str()) {
                zones.push(entry.zone.as_str());
            }
        }
        zones
    }
}
