mod context;

pub use context::{
    CurrentIdentity, CurrentMembership, CurrentTenant, MaybeIdentity, MaybeMembership, MaybeTenant,
};
