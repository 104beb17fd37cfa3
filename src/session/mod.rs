pub mod family;
pub mod pantry;
pub mod store;
