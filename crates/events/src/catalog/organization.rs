//! Organization lifecycle events.

use serde::{Deserialize, Serialize};

use super::{event_types, impl_event};
use crate::event::EventMetadata;

/// An organization (tenant) was created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationCreatedEvent {
    #[serde(flatten)]
    pub(super) metadata: EventMetadata,
    pub organization_id: String,
    pub name: String,
    pub owner_user_id: String,
}

impl OrganizationCreatedEvent {
    pub fn new(
        organization_id: impl Into<String>,
        name: impl Into<String>,
        owner_user_id: impl Into<String>,
    ) -> Self {
        let organization_id = organization_id.into();
        Self {
            metadata: EventMetadata::new(
                event_types::ORGANIZATION_CREATED,
                organization_id.clone(),
            ),
            organization_id,
            name: name.into(),
            owner_user_id: owner_user_id.into(),
        }
    }
}

impl_event!(OrganizationCreatedEvent);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationUpdatedEvent {
    #[serde(flatten)]
    pub(super) metadata: EventMetadata,
    pub organization_id: String,
    pub name: String,
}

impl OrganizationUpdatedEvent {
    pub fn new(organization_id: impl Into<String>, name: impl Into<String>) -> Self {
        let organization_id = organization_id.into();
        Self {
            metadata: EventMetadata::new(
                event_types::ORGANIZATION_UPDATED,
                organization_id.clone(),
            ),
            organization_id,
            name: name.into(),
        }
    }
}

impl_event!(OrganizationUpdatedEvent);

/// An organization was deleted.
///
/// Cross-cutting: users, roles and ideas scoped to the organization react to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationDeletedEvent {
    #[serde(flatten)]
    pub(super) metadata: EventMetadata,
    pub organization_id: String,
    pub name: String,
}

impl OrganizationDeletedEvent {
    pub fn new(organization_id: impl Into<String>, name: impl Into<String>) -> Self {
        let organization_id = organization_id.into();
        Self {
            metadata: EventMetadata::new(
                event_types::ORGANIZATION_DELETED,
                organization_id.clone(),
            ),
            organization_id,
            name: name.into(),
        }
    }
}

impl_event!(OrganizationDeletedEvent);
