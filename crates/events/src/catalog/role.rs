//! Role lifecycle events. Roles are scoped to one organization.

use serde::{Deserialize, Serialize};

use super::{event_types, impl_event};
use crate::event::EventMetadata;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleCreatedEvent {
    #[serde(flatten)]
    pub(super) metadata: EventMetadata,
    pub role_id: String,
    pub organization_id: String,
    pub name: String,
    pub permissions: Vec<String>,
}

impl RoleCreatedEvent {
    pub fn new(
        role_id: impl Into<String>,
        organization_id: impl Into<String>,
        name: impl Into<String>,
        permissions: Vec<String>,
    ) -> Self {
        let role_id = role_id.into();
        Self {
            metadata: EventMetadata::new(event_types::ROLE_CREATED, role_id.clone()),
            role_id,
            organization_id: organization_id.into(),
            name: name.into(),
            permissions,
        }
    }
}

impl_event!(RoleCreatedEvent);

/// A role's name or permission set changed. `permissions` is the full new set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleUpdatedEvent {
    #[serde(flatten)]
    pub(super) metadata: EventMetadata,
    pub role_id: String,
    pub organization_id: String,
    pub name: String,
    pub permissions: Vec<String>,
}

impl RoleUpdatedEvent {
    pub fn new(
        role_id: impl Into<String>,
        organization_id: impl Into<String>,
        name: impl Into<String>,
        permissions: Vec<String>,
    ) -> Self {
        let role_id = role_id.into();
        Self {
            metadata: EventMetadata::new(event_types::ROLE_UPDATED, role_id.clone()),
            role_id,
            organization_id: organization_id.into(),
            name: name.into(),
            permissions,
        }
    }
}

impl_event!(RoleUpdatedEvent);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleDeletedEvent {
    #[serde(flatten)]
    pub(super) metadata: EventMetadata,
    pub role_id: String,
    pub organization_id: String,
    pub name: String,
}

impl RoleDeletedEvent {
    pub fn new(
        role_id: impl Into<String>,
        organization_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let role_id = role_id.into();
        Self {
            metadata: EventMetadata::new(event_types::ROLE_DELETED, role_id.clone()),
            role_id,
            organization_id: organization_id.into(),
            name: name.into(),
        }
    }
}

impl_event!(RoleDeletedEvent);
