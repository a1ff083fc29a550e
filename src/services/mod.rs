pub mod auth;
pub mod deadline;
pub mod membership;
pub mod roles;
pub mod tenant;
