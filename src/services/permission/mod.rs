pub mod endpoints;
pub mod remote;
pub mod source;

pub use endpoints::{EndpointPermissions, StaticPermissionSource};
pub use remote::{RemotePermissionClient, RemotePermissionConfig, RemotePermissionError};
pub use source::{
    Authorizer, PERMISSION_DENIED_MESSAGE, PermissionError, PermissionMap, PermissionQuery,
    PermissionSource,
};
