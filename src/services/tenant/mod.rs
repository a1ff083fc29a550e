pub mod directory;
pub mod extractor;
pub mod resolve;
pub mod slot;
pub mod validator;

pub use directory::{CachedTenantEntry, TenantDirectory};
pub use extractor::{ExtractedTenant, TenantRequest, TenantSource, extract};
pub use resolve::{resolve_request_tenant, resolve_tenant};
pub use slot::TenantDirectorySlot;
pub use validator::{canonical_identifier, is_valid_identifier};
