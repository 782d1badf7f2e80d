// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Vendedores ---
        handlers::dashboard::get_personnel,

        // --- Geo ---
        handlers::dashboard::list_zones,
        handlers::crm::resolve_location,

        // --- Clientes ---
        handlers::crm::list_customers,
        handlers::crm::get_customer,
        handlers::crm::create_customer,
        handlers::crm::update_customer,
        handlers::crm::delete_customer,
        handlers::crm::add_price_quote,
        handlers::crm::export_customers,

        // --- Visitas ---
        handlers::visits::list_visits,
        handlers::visits::log_visit,
        handlers::visits::update_visit,
        handlers::visits::set_visit_status,
        handlers::visits::delete_visit,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
    ),
    components(
        schemas(
            // --- GEO ---
            models::geo::GeoEntry,
            models::geo::PincodeEntry,
            models::geo::ResolvedLocation,

            // --- CRM ---
            models::crm::CustomerStatus,
            models::crm::Contact,
            models::crm::PriceQuote,
            models::crm::Customer,
            models::crm::CustomerForm,
            models::crm::PriceQuotePayload,

            // --- VISITAS ---
            models::visits::VisitStatus,
            models::visits::Visit,
            models::visits::VisitForm,
            models::visits::VisitStatusPayload,

            // --- EXPORTAÇÃO ---
            models::export::ExportFormat,
            models::export::ExportRow,

            // --- DASHBOARD ---
            models::dashboard::CategoryCount,
            models::dashboard::DashboardSummary,
            models::dashboard::PersonnelRoster,
        )
    ),
    tags(
        (name = "Personnel", description = "Roster and the acting personnel"),
        (name = "Geo", description = "Zone reference and location inference"),
        (name = "Customers", description = "Customer records, pricing history and exports"),
        (name = "Visits", description = "Visit log per customer"),
        (name = "Dashboard", description = "Badge counts")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/personnel",
            "/api/geo/zones",
            "/api/geo/resolve",
            "/api/customers",
            "/api/customers/{id}",
            "/api/customers/{id}/pricing",
            "/api/customers/export",
            "/api/visits",
            "/api/visits/{id}",
            "/api/visits/{id}/status",
            "/api/dashboard/summary",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
