pub mod crm;
pub mod dashboard;
pub mod export;
pub mod geo;
pub mod session;
pub mod visits;
