pub mod crm_repo;
pub use crm_repo::CrmRepository;
pub mod visit_repo;
pub use visit_repo::VisitRepository;
