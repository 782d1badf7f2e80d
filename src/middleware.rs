pub mod personnel;
