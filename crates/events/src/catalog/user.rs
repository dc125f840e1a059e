//! User lifecycle and organization-membership events.
//!
//! Membership events use the user as aggregate; the organization is payload.

use serde::{Deserialize, Serialize};

use super::{event_types, impl_event};
use crate::event::EventMetadata;

/// A user was created with an initial role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserCreatedEvent {
    #[serde(flatten)]
    pub(super) metadata: EventMetadata,
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub role_id: String,
    pub role_name: String,
}

impl UserCreatedEvent {
    pub fn new(
        user_id: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
        role_id: impl Into<String>,
        role_name: impl Into<String>,
    ) -> Self {
        let user_id = user_id.into();
        Self {
            metadata: EventMetadata::new(event_types::USER_CREATED, user_id.clone()),
            user_id,
            email: email.into(),
            name: name.into(),
            role_id: role_id.into(),
            role_name: role_name.into(),
        }
    }
}

impl_event!(UserCreatedEvent);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserUpdatedEvent {
    #[serde(flatten)]
    pub(super) metadata: EventMetadata,
    pub user_id: String,
    pub email: String,
    pub name: String,
}

impl UserUpdatedEvent {
    pub fn new(
        user_id: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let user_id = user_id.into();
        Self {
            metadata: EventMetadata::new(event_types::USER_UPDATED, user_id.clone()),
            user_id,
            email: email.into(),
            name: name.into(),
        }
    }
}

impl_event!(UserUpdatedEvent);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDeletedEvent {
    #[serde(flatten)]
    pub(super) metadata: EventMetadata,
    pub user_id: String,
    pub email: String,
}

impl UserDeletedEvent {
    pub fn new(user_id: impl Into<String>, email: impl Into<String>) -> Self {
        let user_id = user_id.into();
        Self {
            metadata: EventMetadata::new(event_types::USER_DELETED, user_id.clone()),
            user_id,
            email: email.into(),
        }
    }
}

impl_event!(UserDeletedEvent);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAddedToOrganizationEvent {
    #[serde(flatten)]
    pub(super) metadata: EventMetadata,
    pub user_id: String,
    pub organization_id: String,
    pub role_id: String,
    pub role_name: String,
}

impl UserAddedToOrganizationEvent {
    pub fn new(
        user_id: impl Into<String>,
        organization_id: impl Into<String>,
        role_id: impl Into<String>,
        role_name: impl Into<String>,
    ) -> Self {
        let user_id = user_id.into();
        Self {
            metadata: EventMetadata::new(event_types::USER_ADDED_TO_ORGANIZATION, user_id.clone()),
            user_id,
            organization_id: organization_id.into(),
            role_id: role_id.into(),
            role_name: role_name.into(),
        }
    }
}

impl_event!(UserAddedToOrganizationEvent);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRemovedFromOrganizationEvent {
    #[serde(flatten)]
    pub(super) metadata: EventMetadata,
    pub user_id: String,
    pub organization_id: String,
}

impl UserRemovedFromOrganizationEvent {
    pub fn new(user_id: impl Into<String>, organization_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        Self {
            metadata: EventMetadata::new(
                event_types::USER_REMOVED_FROM_ORGANIZATION,
                user_id.clone(),
            ),
            user_id,
            organization_id: organization_id.into(),
        }
    }
}

impl_event!(UserRemovedFromOrganizationEvent);

/// A user's role within one organization changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRoleChangedInOrganizationEvent {
    #[serde(flatten)]
    pub(super) metadata: EventMetadata,
    pub user_id: String,
    pub organization_id: String,
    pub old_role_id: String,
    pub new_role_id: String,
    pub new_role_name: String,
}

impl UserRoleChangedInOrganizationEvent {
    pub fn new(
        user_id: impl Into<String>,
        organization_id: impl Into<String>,
        old_role_id: impl Into<String>,
        new_role_id: impl Into<String>,
        new_role_name: impl Into<String>,
    ) -> Self {
        let user_id = user_id.into();
        Self {
            metadata: EventMetadata::new(
                event_types::USER_ROLE_CHANGED_IN_ORGANIZATION,
                user_id.clone(),
            ),
            user_id,
            organization_id: organization_id.into(),
            old_role_id: old_role_id.into(),
            new_role_id: new_role_id.into(),
            new_role_name: new_role_name.into(),
        }
    }
}

impl_event!(UserRoleChangedInOrganizationEvent);
