// src/models/crm.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

// --- ENUMS ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CustomerStatus {
    #[default]
    Open,
    Closed,
}

impl CustomerStatus {
    pub const ALL: [CustomerStatus; 2] = [CustomerStatus::Open, CustomerStatus::Closed];

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Open => "Open",
            CustomerStatus::Closed => "Closed",
        }
    }
}

// --- CLIENTE (gravado inteiro, substituído a cada save) ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    #[schema(example = "Rahul Sharma")]
    pub name: String,
    #[schema(example = "Purchase Manager")]
    pub designation: String,
    #[schema(example = "rahul@acme.in")]
    pub email: String,
    #[schema(example = "+91 98100 00000")]
    pub phone: String,
}

/// Entrada de preço, só se acrescenta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    #[schema(example = "HDPE Granules")]
    pub product: String,
    /// Rúpias por unidade.
    #[schema(example = 142)]
    pub price: i64,
    #[schema(value_type = String, format = Date, example = "2024-03-01")]
    pub quoted_on: NaiveDate,
    pub recorded_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,

    #[schema(example = "Acme Polymers Pvt Ltd")]
    pub name: String,
    #[schema(example = "Ludhiana")]
    pub city: String,
    #[schema(example = "Punjab")]
    pub state: String,
    #[schema(example = "India")]
    pub country: String,
    #[schema(example = "141001")]
    pub pincode: String,
    #[schema(example = "Focal Point Phase 8")]
    pub area: String,
    #[schema(example = "Packaging")]
    pub industry: String,

    // Rúpias inteiras.
    #[schema(example = 50000000)]
    pub annual_turnover: i64,
    #[schema(example = 2500000)]
    pub project_turnover: i64,

    #[schema(example = "ENQ-2024-118")]
    pub enquiry_no: String,
    pub status: CustomerStatus,

    #[schema(value_type = Option<String>, format = Date, example = "2024-03-01")]
    pub last_interaction: Option<NaiveDate>,

    /// Override explícito de zona. Sem ele a zona é derivada de estado/cidade
    /// sempre que for necessária.
    #[serde(default)]
    pub zone: Option<String>,

    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub pricing_history: Vec<PriceQuote>,

    pub last_modified_by: String,
    #[schema(example = "01 Mar 2024 03:04:05 PM")]
    pub updated_at: String,
}

// --- PAYLOADS ---

/// Formulário cru do cliente. Todo campo é opcional: na criação os ausentes
/// recebem padrão, na edição vêm do registro gravado.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerForm {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Acme Polymers Pvt Ltd")]
    pub name: Option<String>,
    #[schema(example = "Ludhiana")]
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    #[schema(example = "141001")]
    pub pincode: Option<String>,
    pub area: Option<String>,
    pub industry: Option<String>,

    // Texto livre, interpretado com tolerância ("5,00,00,000" serve).
    #[schema(example = "5,00,00,000")]
    pub annual_turnover: Option<String>,
    pub project_turnover: Option<String>,

    pub enquiry_no: Option<String>,
    pub status: Option<CustomerStatus>,
    #[schema(value_type = Option<String>, format = Date)]
    pub last_interaction: Option<NaiveDate>,
    pub zone: Option<String>,

    pub contact_name: Option<String>,
    pub contact_designation: Option<String>,
    #[validate(email(message = "invalid_email"))]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

impl CustomerForm {
    pub fn has_contact_fields(&self) -> bool {
        self.contact_name.is_some()
            || self.contact_designation.is_some()
            || self.contact_email.is_some()
            || self.contact_phone.is_some()
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuotePayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "HDPE Granules")]
    pub product: String,
    #[validate(range(min = 0, message = "invalid_price"))]
    #[schema(example = 142)]
    pub price: i64,
    #[schema(value_type = Option<String>, format = Date)]
    pub quoted_on: Option<NaiveDate>,
}

/// Filtros de query string da lista de clientes e da exportação.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct CustomerQuery {
    /// Texto livre sobre nome, cidade e estado.
    pub search: Option<String>,
    /// Nome da zona ou "All".
    pub zone: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    /// "Open", "Closed" ou "All".
    pub status: Option<String>,
    /// "name", "-name" ou "-turnover". Sem ele, ordem da coleção.
    pub sort: Option<String>,
}
