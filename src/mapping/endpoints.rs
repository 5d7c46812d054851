//! Endpoint Capabilities
//!
//! Which endpoints a resource has on each backend version, and how update is
//! spelled.

use crate::types::{BackendVersion, ResourceKind};

/// How a single record is looked up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupStyle {
    /// No lookup endpoint: fetch the list and filter by id.
    ListScan,
    /// Lookup is not offered for this resource.
    Unsupported,
}

/// How an existing record is updated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateStyle {
    /// `PUT {prefix}/update/{id}`.
    Put,
    /// `POST {prefix}/save` with the numeric `id` in the body.
    SaveWithId,
}

/// Whether `DELETE {prefix}/delete/{id}` exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteSupport {
    Available,
    Unsupported,
}

/// Endpoint capabilities of one resource on one backend version.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EndpointSet {
    pub lookup: LookupStyle,
    pub update: UpdateStyle,
    pub delete: DeleteSupport,
}

/// Capabilities of `kind` on `version`.
pub fn endpoints(kind: ResourceKind, version: BackendVersion) -> EndpointSet {
    let lookup = match kind {
        ResourceKind::Account | ResourceKind::Inventory => LookupStyle::Unsupported,
        _ => LookupStyle::ListScan,
    };

    let update = match version {
        BackendVersion::V1 => UpdateStyle::SaveWithId,
        BackendVersion::V2 => UpdateStyle::Put,
    };

    let delete = match (version, kind) {
        (BackendVersion::V1, ResourceKind::Sale | ResourceKind::Inventory) => {
            DeleteSupport::Unsupported
        }
        _ => DeleteSupport::Available,
    };

    EndpointSet {
        lookup,
        update,
        delete,
    }
}
