pub mod envelope;
pub mod identity;
pub mod tenants;
