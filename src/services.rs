pub mod crm_service;
pub mod dashboard_service;
pub mod document_service;
pub mod location_service;
pub mod normalize;
pub mod query_service;
pub mod visit_service;
