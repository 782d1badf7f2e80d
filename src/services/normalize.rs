// src/services/normalize.rs
//
// Transforma a entrada crua do formulário em registros completos. Puro: nada
// aqui toca o banco e nada aqui falha. Entrada ruim ou ausente vira um valor
// padrão que o dashboard ainda consegue exibir.

use std::str::FromStr;

use rust_decimal::{prelude::ToPrimitive, Decimal};
use uuid::Uuid;

use crate::{
    models::{
        crm::{Contact, Customer, CustomerForm, PriceQuote, PriceQuotePayload},
        session::SessionContext,
        visits::{Visit, VisitForm, VisitStatus},
    },
    services::location_service::{sanitize_pincode, LocationService},
};

pub const DEFAULT_COUNTRY: &str = "India";

/// Parser tolerante de rúpias. Separadores são ignorados e frações
/// arredondadas; o que não for número vira zero.
pub fn parse_amount(raw: &str) -> i64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | ' ' | '₹'))
        .collect();

    Decimal::from_str(&cleaned)
        .ok()
        .and_then(|d| d.round().to_i64())
        .unwrap_or(0)
}

// Valor recebido se houver, senão o gravado, senão vazio.
fn carry(incoming: &Option<String>, prior: Option<&String>) -> String {
    match incoming {
        Some(value) => value.trim().to_string(),
        None => prior.cloned().unwrap_or_default(),
    }
}

fn contact_from_form(form: &CustomerForm, id: Uuid) -> Contact {
    let field = |v: &Option<String>| v.as_deref().map(str::trim).unwrap_or_default().to_string();
    Contact {
        id,
        name: field(&form.contact_name),
        designation: field(&form.contact_designation),
        email: field(&form.contact_email),
        phone: field(&form.contact_phone),
    }
}

pub fn normalize_customer(
    location: &LocationService,
    form: &CustomerForm,
    existing: Option<&Customer>,
    session: &SessionContext,
) -> Customer {
    // Localização ausente cai para o registro gravado antes da resolução.
    let city_in = form.city.clone().or_else(|| existing.map(|e| e.city.clone()));
    let state_in = form.state.clone().or_else(|| existing.map(|e| e.state.clone()));

    // Só um pincode digitado neste formulário sobrescreve cidade/estado. O
    // gravado é mantido no registro, mas não é resolvido de novo.
    let typed_pincode = form.pincode.as_deref().map(sanitize_pincode);
    let resolved = location.resolve(city_in.as_deref(), state_in.as_deref(), typed_pincode.as_deref());
    let pincode = typed_pincode
        .or_else(|| existing.map(|e| e.pincode.clone()))
        .unwrap_or_default();

    let zone = match &form.zone {
        Some(z) => Some(z.trim().to_string()).filter(|z| !z.is_empty()),
        None => existing.and_then(|e| e.zone.clone()),
    };

    let annual_turnover = match &form.annual_turnover {
        Some(raw) => parse_amount(raw),
        None => existing.map(|e| e.annual_turnover).unwrap_or(0),
    };
    let project_turnover = match &form.project_turnover {
        Some(raw) => parse_amount(raw),
        None => existing.map(|e| e.project_turnover).unwrap_or(0),
    };

    let contacts = match existing {
        Some(prior) if form.has_contact_fields() => {
            let id = prior.contacts.first().map(|c| c.id).unwrap_or_else(Uuid::new_v4);
            vec![contact_from_form(form, id)]
        }
        Some(prior) => prior.contacts.clone(),
        None => match form.contact_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => vec![contact_from_form(form, Uuid::new_v4())],
            _ => Vec::new(),
        },
    };

    let country = carry(&form.country, existing.map(|e| &e.country));

    Customer {
        id: existing.map(|e| e.id).unwrap_or_else(Uuid::new_v4),
        name: carry(&form.name, existing.map(|e| &e.name)),
        city: resolved.city,
        state: resolved.state,
        country: if country.is_empty() { DEFAULT_COUNTRY.to_string() } else { country },
        pincode,
        area: carry(&form.area, existing.map(|e| &e.area)),
        industry: carry(&form.industry, existing.map(|e| &e.industry)),
        annual_turnover,
        project_turnover,
        enquiry_no: carry(&form.enquiry_no, existing.map(|e| &e.enquiry_no)),
        status: form
            .status
            .or_else(|| existing.map(|e| e.status))
            .unwrap_or_default(),
        last_interaction: form
            .last_interaction
            .or_else(|| existing.and_then(|e| e.last_interaction)),
        zone,
        contacts,
        pricing_history: existing.map(|e| e.pricing_history.clone()).unwrap_or_default(),
        last_modified_by: session.personnel.clone(),
        updated_at: session.timestamp(),
    }
}

/// Onde o formulário de visita é aplicado: um cliente que existe agora (nova
/// visita) ou uma visita já registrada (edição).
#[derive(Debug, Clone, Copy)]
pub enum VisitBasis<'a> {
    New(&'a Customer),
    Edit(&'a Visit),
}

/// Na criação o nome atual do cliente é copiado. Na edição a cópia e a
/// referência ao cliente ficam como foram registradas.
pub fn normalize_visit(form: &VisitForm, basis: VisitBasis<'_>, session: &SessionContext) -> Visit {
    let existing = match basis {
        VisitBasis::Edit(prior) => Some(prior),
        VisitBasis::New(_) => None,
    };
    let (customer_id, customer_name) = match basis {
        VisitBasis::Edit(prior) => (prior.customer_id, prior.customer_name.clone()),
        VisitBasis::New(customer) => (customer.id, customer.name.clone()),
    };

    let assigned_to = match form.assigned_to.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => existing
            .map(|e| e.assigned_to.clone())
            .unwrap_or_else(|| session.personnel.clone()),
    };

    Visit {
        id: existing.map(|e| e.id).unwrap_or_else(Uuid::new_v4),
        customer_id,
        customer_name,
        date: form
            .date
            .or_else(|| existing.map(|e| e.date))
            .unwrap_or_else(|| session.today()),
        purpose: carry(&form.purpose, existing.map(|e| &e.purpose)),
        assigned_to,
        status: form
            .status
            .or_else(|| existing.map(|e| e.status))
            .unwrap_or_default(),
        notes: carry(&form.notes, existing.map(|e| &e.notes)),
        last_modified_by: session.personnel.clone(),
        updated_at: session.timestamp(),
    }
}

pub fn transition_visit(visit: &Visit, status: VisitStatus, session: &SessionContext) -> Visit {
    Visit {
        status,
        last_modified_by: session.personnel.clone(),
        updated_at: session.timestamp(),
        ..visit.clone()
    }
}

pub fn append_price_quote(
    customer: &Customer,
    payload: &PriceQuotePayload,
    session: &SessionContext,
) -> Customer {
    let mut updated = customer.clone();
    updated.pricing_history.push(PriceQuote {
        product: payload.product.trim().to_string(),
        price: payload.price,
        quoted_on: payload.quoted_on.unwrap_or_else(|| session.today()),
        recorded_by: session.personnel.clone(),
    });
    updated.last_modified_by = session.personnel.clone();
    updated.updated_at = session.timestamp();
    updated
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{NaiveDate, TimeZone};

    use super::*;
    use crate::{
        common::time::TARGET_TZ,
        models::{crm::CustomerStatus, geo::GeoReference},
    };

    fn location() -> LocationService {
        LocationService::new(Arc::new(GeoReference::builtin()))
    }

    fn session(who: &str, hour: u32) -> SessionContext {
        SessionContext::new(who, TARGET_TZ.with_ymd_and_hms(2024, 3, 1, hour, 4, 5).unwrap())
    }

    fn full_form() -> CustomerForm {
        CustomerForm {
            name: Some("Acme Polymers".into()),
            city: Some("Ludhiana".into()),
            state: Some("Punjab".into()),
            country: Some("India".into()),
            pincode: Some("141001".into()),
            area: Some("Focal Point".into()),
            industry: Some("Packaging".into()),
            annual_turnover: Some("5,00,00,000".into()),
            project_turnover: Some("25 00 000".into()),
            enquiry_no: Some("ENQ-1".into()),
            status: Some(CustomerStatus::Open),
            last_interaction: NaiveDate::from_ymd_opt(2024, 2, 20),
            zone: None,
            contact_name: Some("Rahul".into()),
            contact_designation: Some("Buyer".into()),
            contact_email: Some("rahul@acme.in".into()),
            contact_phone: Some("98100".into()),
        }
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("5,00,00,000"), 50_000_000);
        assert_eq!(parse_amount("12.6"), 13);
        assert_eq!(parse_amount("₹ 1,200"), 1200);
        assert_eq!(parse_amount("abc"), 0);
        assert_eq!(parse_amount(""), 0);
    }

    #[test]
    fn test_create_from_pincode_only() {
        let form = CustomerForm {
            name: Some("Delhi Traders".into()),
            pincode: Some("110001".into()),
            ..Default::default()
        };
        let c = normalize_customer(&location(), &form, None, &session("Priya", 15));

        assert_eq!(c.city, "New Delhi");
        assert_eq!(c.state, "Delhi");
        assert_eq!(c.country, DEFAULT_COUNTRY);
        assert_eq!(c.status, CustomerStatus::Open);
        assert!(c.contacts.is_empty());
        assert_eq!(c.last_modified_by, "Priya");
        assert_eq!(c.updated_at, "01 Mar 2024 03:04:05 PM");
    }

    #[test]
    fn test_create_with_city_only() {
        let form = CustomerForm {
            city: Some("Ludhiana".into()),
            ..Default::default()
        };
        let c = normalize_customer(&location(), &form, None, &session("Priya", 10));
        assert_eq!(c.state, "Punjab");
    }

    #[test]
    fn test_create_fills_sentinels() {
        let c = normalize_customer(&location(), &CustomerForm::default(), None, &session("Priya", 10));
        assert_eq!(c.city, "Principal City");
        assert_eq!(c.state, "N/A");
    }

    #[test]
    fn test_bad_turnover_becomes_zero() {
        let form = CustomerForm {
            annual_turnover: Some("about a crore".into()),
            ..Default::default()
        };
        let c = normalize_customer(&location(), &form, None, &session("Priya", 10));
        assert_eq!(c.annual_turnover, 0);
    }

    #[test]
    fn test_contact_built_only_with_name() {
        let form = CustomerForm {
            contact_email: Some("x@y.in".into()),
            ..Default::default()
        };
        let c = normalize_customer(&location(), &form, None, &session("Priya", 10));
        assert!(c.contacts.is_empty());

        let c = normalize_customer(&location(), &full_form(), None, &session("Priya", 10));
        assert_eq!(c.contacts.len(), 1);
        assert_eq!(c.contacts[0].name, "Rahul");
    }

    #[test]
    fn test_identical_edit_only_changes_provenance() {
        let loc = location();
        let created = normalize_customer(&loc, &full_form(), None, &session("Priya", 10));
        let edited = normalize_customer(&loc, &full_form(), Some(&created), &session("Arjun", 16));

        assert_eq!(edited.last_modified_by, "Arjun");
        assert_ne!(edited.updated_at, created.updated_at);
        assert_eq!(
            Customer {
                last_modified_by: created.last_modified_by.clone(),
                updated_at: created.updated_at.clone(),
                ..edited
            },
            created
        );
    }

    #[test]
    fn test_empty_edit_carries_everything() {
        let loc = location();
        let created = normalize_customer(&loc, &full_form(), None, &session("Priya", 10));
        let edited = normalize_customer(&loc, &CustomerForm::default(), Some(&created), &session("Arjun", 11));

        assert_eq!(edited.id, created.id);
        assert_eq!(edited.name, created.name);
        assert_eq!(edited.annual_turnover, created.annual_turnover);
        assert_eq!(edited.contacts, created.contacts);
        assert_eq!(edited.last_modified_by, "Arjun");
    }

    #[test]
    fn test_edit_location_with_stored_pincode() {
        let loc = location();
        let form = CustomerForm {
            name: Some("Acme Polymers".into()),
            pincode: Some("141001".into()),
            ..Default::default()
        };
        let created = normalize_customer(&loc, &form, None, &session("Priya", 10));
        assert_eq!(created.city, "Ludhiana");
        assert_eq!(created.state, "Punjab");

        let moved = CustomerForm {
            city: Some("Pune".into()),
            state: Some("Maharashtra".into()),
            ..Default::default()
        };
        let edited = normalize_customer(&loc, &moved, Some(&created), &session("Arjun", 11));
        assert_eq!(edited.city, "Pune");
        assert_eq!(edited.state, "Maharashtra");
        assert_eq!(edited.pincode, "141001");

        // Pincode digitado na edição continua vencendo.
        let retyped = CustomerForm {
            city: Some("Pune".into()),
            pincode: Some("110001".into()),
            ..Default::default()
        };
        let edited = normalize_customer(&loc, &retyped, Some(&created), &session("Arjun", 12));
        assert_eq!(edited.city, "New Delhi");
        assert_eq!(edited.state, "Delhi");
        assert_eq!(edited.pincode, "110001");
    }

    #[test]
    fn test_edit_replaces_contact_wholesale() {
        let loc = location();
        let created = normalize_customer(&loc, &full_form(), None, &session("Priya", 10));
        let form = CustomerForm {
            contact_phone: Some("99999".into()),
            ..Default::default()
        };
        let edited = normalize_customer(&loc, &form, Some(&created), &session("Priya", 11));

        assert_eq!(edited.contacts.len(), 1);
        assert_eq!(edited.contacts[0].id, created.contacts[0].id);
        assert_eq!(edited.contacts[0].phone, "99999");
        assert_eq!(edited.contacts[0].name, "");
    }

    #[test]
    fn test_edit_keeps_pricing_history() {
        let loc = location();
        let created = normalize_customer(&loc, &full_form(), None, &session("Priya", 10));
        let quote = PriceQuotePayload {
            product: "HDPE".into(),
            price: 140,
            quoted_on: None,
        };
        let quoted = append_price_quote(&created, &quote, &session("Arjun", 12));
        assert_eq!(quoted.pricing_history.len(), 1);
        assert_eq!(quoted.pricing_history[0].quoted_on, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(quoted.pricing_history[0].recorded_by, "Arjun");

        let edited = normalize_customer(&loc, &full_form(), Some(&quoted), &session("Priya", 13));
        assert_eq!(edited.pricing_history, quoted.pricing_history);
    }

    #[test]
    fn test_blank_zone_clears_override() {
        let loc = location();
        let form = CustomerForm {
            zone: Some("Key Accounts".into()),
            ..Default::default()
        };
        let created = normalize_customer(&loc, &form, None, &session("Priya", 10));
        assert_eq!(created.zone.as_deref(), Some("Key Accounts"));

        let form = CustomerForm {
            zone: Some(" ".into()),
            ..Default::default()
        };
        let edited = normalize_customer(&loc, &form, Some(&created), &session("Priya", 11));
        assert_eq!(edited.zone, None);
    }

    #[test]
    fn test_new_visit_defaults() {
        let loc = location();
        let customer = normalize_customer(&loc, &full_form(), None, &session("Priya", 10));
        let visit = normalize_visit(&VisitForm::default(), VisitBasis::New(&customer), &session("Priya", 23));

        assert_eq!(visit.customer_id, customer.id);
        assert_eq!(visit.customer_name, "Acme Polymers");
        assert_eq!(visit.assigned_to, "Priya");
        assert_eq!(visit.status, VisitStatus::Planned);
        assert_eq!(visit.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_visit_keeps_customer_snapshot_after_rename() {
        let loc = location();
        let customer = normalize_customer(&loc, &full_form(), None, &session("Priya", 10));
        let visit = normalize_visit(&VisitForm::default(), VisitBasis::New(&customer), &session("Priya", 10));

        let renamed = CustomerForm {
            name: Some("Acme Industries".into()),
            ..Default::default()
        };
        let customer = normalize_customer(&loc, &renamed, Some(&customer), &session("Priya", 11));
        assert_eq!(customer.name, "Acme Industries");

        let form = VisitForm {
            notes: Some("Met the plant head".into()),
            ..Default::default()
        };
        let edited = normalize_visit(&form, VisitBasis::Edit(&visit), &session("Arjun", 12));
        assert_eq!(edited.customer_name, "Acme Polymers");
        assert_eq!(edited.notes, "Met the plant head");
        assert_eq!(edited.assigned_to, "Priya");
        assert_eq!(edited.last_modified_by, "Arjun");
    }

    #[test]
    fn test_any_visit_transition_is_allowed() {
        let loc = location();
        let customer = normalize_customer(&loc, &full_form(), None, &session("Priya", 10));
        let visit = normalize_visit(&VisitForm::default(), VisitBasis::New(&customer), &session("Priya", 10));

        for from in VisitStatus::ALL {
            for to in VisitStatus::ALL {
                let start = transition_visit(&visit, from, &session("Priya", 11));
                let moved = transition_visit(&start, to, &session("Arjun", 12));
                assert_eq!(moved.status, to);
                assert_eq!(moved.last_modified_by, "Arjun");
                assert_eq!(moved.date, visit.date);
            }
        }
    }
}
