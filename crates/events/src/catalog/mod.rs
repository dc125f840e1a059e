//! Concrete domain events emitted by the organization, user and role services.
//!
//! Every concrete event is a plain struct: private [`EventMetadata`] plus public
//! payload fields. [`DomainEvent`] closes the set so consumers can `match` on the
//! variant instead of downcasting.

use chrono::{DateTime, Utc};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};

use crate::event::{Event, EventId, EventMetadata};

/// Event type tags, `{domain}.{past_tense_action}`.
pub mod event_types {
    pub const ORGANIZATION_CREATED: &str = "organization.created";
    pub const ORGANIZATION_UPDATED: &str = "organization.updated";
    pub const ORGANIZATION_DELETED: &str = "organization.deleted";

    pub const USER_CREATED: &str = "user.created";
    pub const USER_UPDATED: &str = "user.updated";
    pub const USER_DELETED: &str = "user.deleted";
    pub const USER_ADDED_TO_ORGANIZATION: &str = "user.added_to_organization";
    pub const USER_REMOVED_FROM_ORGANIZATION: &str = "user.removed_from_organization";
    pub const USER_ROLE_CHANGED_IN_ORGANIZATION: &str = "user.role_changed_in_organization";

    pub const ROLE_CREATED: &str = "role.created";
    pub const ROLE_UPDATED: &str = "role.updated";
    pub const ROLE_DELETED: &str = "role.deleted";

    /// Every tag in the catalog.
    pub const ALL: &[&str] = &[
        ORGANIZATION_CREATED,
        ORGANIZATION_UPDATED,
        ORGANIZATION_DELETED,
        USER_CREATED,
        USER_UPDATED,
        USER_DELETED,
        USER_ADDED_TO_ORGANIZATION,
        USER_REMOVED_FROM_ORGANIZATION,
        USER_ROLE_CHANGED_IN_ORGANIZATION,
        ROLE_CREATED,
        ROLE_UPDATED,
        ROLE_DELETED,
    ];

    /// The catalog constant equal to `tag`, if any.
    pub fn lookup(tag: &str) -> Option<&'static str> {
        ALL.iter().copied().find(|known| *known == tag)
    }
}

/// Implements [`Event`] for a struct with a `metadata: EventMetadata` field,
/// plus the shared `with_version` builder.
macro_rules! impl_event {
    ($t:ty) => {
        impl $t {
            /// Override the aggregate version (defaults to 1).
            pub fn with_version(mut self, version: u64) -> Self {
                self.metadata = self.metadata.with_version(version);
                self
            }
        }

        impl $crate::event::Event for $t {
            fn event_id(&self) -> $crate::event::EventId {
                self.metadata.event_id()
            }

            fn event_type(&self) -> &'static str {
                self.metadata.event_type()
            }

            fn aggregate_id(&self) -> &str {
                self.metadata.aggregate_id()
            }

            fn occurred_at(&self) -> chrono::DateTime<chrono::Utc> {
                self.metadata.occurred_at()
            }

            fn version(&self) -> u64 {
                self.metadata.version()
            }
        }
    };
}

pub(crate) use impl_event;

pub mod organization;
pub mod role;
pub mod user;

pub use organization::{
    OrganizationCreatedEvent, OrganizationDeletedEvent, OrganizationUpdatedEvent,
};
pub use role::{RoleCreatedEvent, RoleDeletedEvent, RoleUpdatedEvent};
pub use user::{
    UserAddedToOrganizationEvent, UserCreatedEvent, UserDeletedEvent,
    UserRemovedFromOrganizationEvent, UserRoleChangedInOrganizationEvent, UserUpdatedEvent,
};

/// All domain events.
///
/// Serialized as the flat JSON object of the variant; deserialization picks the
/// variant from its `event_type` field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DomainEvent {
    OrganizationCreated(OrganizationCreatedEvent),
    OrganizationUpdated(OrganizationUpdatedEvent),
    OrganizationDeleted(OrganizationDeletedEvent),
    UserCreated(UserCreatedEvent),
    UserUpdated(UserUpdatedEvent),
    UserDeleted(UserDeletedEvent),
    UserAddedToOrganization(UserAddedToOrganizationEvent),
    UserRemovedFromOrganization(UserRemovedFromOrganizationEvent),
    UserRoleChangedInOrganization(UserRoleChangedInOrganizationEvent),
    RoleCreated(RoleCreatedEvent),
    RoleUpdated(RoleUpdatedEvent),
    RoleDeleted(RoleDeletedEvent),
}

impl DomainEvent {
    fn metadata(&self) -> &EventMetadata {
        match self {
            DomainEvent::OrganizationCreated(e) => &e.metadata,
            DomainEvent::OrganizationUpdated(e) => &e.metadata,
            DomainEvent::OrganizationDeleted(e) => &e.metadata,
            DomainEvent::UserCreated(e) => &e.metadata,
            DomainEvent::UserUpdated(e) => &e.metadata,
            DomainEvent::UserDeleted(e) => &e.metadata,
            DomainEvent::UserAddedToOrganization(e) => &e.metadata,
            DomainEvent::UserRemovedFromOrganization(e) => &e.metadata,
            DomainEvent::UserRoleChangedInOrganization(e) => &e.metadata,
            DomainEvent::RoleCreated(e) => &e.metadata,
            DomainEvent::RoleUpdated(e) => &e.metadata,
            DomainEvent::RoleDeleted(e) => &e.metadata,
        }
    }
}

impl Event for DomainEvent {
    fn event_id(&self) -> EventId {
        self.metadata().event_id()
    }

    fn event_type(&self) -> &'static str {
        self.metadata().event_type()
    }

    fn aggregate_id(&self) -> &str {
        self.metadata().aggregate_id()
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.metadata().occurred_at()
    }

    fn version(&self) -> u64 {
        self.metadata().version()
    }
}

impl<'de> Deserialize<'de> for DomainEvent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let tag = value
            .get("event_type")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| D::Error::missing_field("event_type"))?;

        let event = match tag.as_str() {
            event_types::ORGANIZATION_CREATED => variant(value, Self::OrganizationCreated),
            event_types::ORGANIZATION_UPDATED => variant(value, Self::OrganizationUpdated),
            event_types::ORGANIZATION_DELETED => variant(value, Self::OrganizationDeleted),
            event_types::USER_CREATED => variant(value, Self::UserCreated),
            event_types::USER_UPDATED => variant(value, Self::UserUpdated),
            event_types::USER_DELETED => variant(value, Self::UserDeleted),
            event_types::USER_ADDED_TO_ORGANIZATION => {
                variant(value, Self::UserAddedToOrganization)
            }
            event_types::USER_REMOVED_FROM_ORGANIZATION => {
                variant(value, Self::UserRemovedFromOrganization)
            }
            event_types::USER_ROLE_CHANGED_IN_ORGANIZATION => {
                variant(value, Self::UserRoleChangedInOrganization)
            }
            event_types::ROLE_CREATED => variant(value, Self::RoleCreated),
            event_types::ROLE_UPDATED => variant(value, Self::RoleUpdated),
            event_types::ROLE_DELETED => variant(value, Self::RoleDeleted),
            other => return Err(D::Error::unknown_variant(other, event_types::ALL)),
        };
        event.map_err(D::Error::custom)
    }
}

fn variant<T, F>(value: serde_json::Value, wrap: F) -> serde_json::Result<DomainEvent>
where
    T: DeserializeOwned,
    F: FnOnce(T) -> DomainEvent,
{
    serde_json::from_value(value).map(wrap)
}

macro_rules! impl_from_event {
    ($($variant:ident($t:ty)),* $(,)?) => {
        $(
            impl From<$t> for DomainEvent {
                fn from(value: $t) -> Self {
                    DomainEvent::$variant(value)
                }
            }
        )*
    };
}

impl_from_event!(
    OrganizationCreated(OrganizationCreatedEvent),
    OrganizationUpdated(OrganizationUpdatedEvent),
    OrganizationDeleted(OrganizationDeletedEvent),
    UserCreated(UserCreatedEvent),
    UserUpdated(UserUpdatedEvent),
    UserDeleted(UserDeletedEvent),
    UserAddedToOrganization(UserAddedToOrganizationEvent),
    UserRemovedFromOrganization(UserRemovedFromOrganizationEvent),
    UserRoleChangedInOrganization(UserRoleChangedInOrganizationEvent),
    RoleCreated(RoleCreatedEvent),
    RoleUpdated(RoleUpdatedEvent),
    RoleDeleted(RoleDeletedEvent),
);

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn sample_events() -> Vec<DomainEvent> {
        vec![
            OrganizationCreatedEvent::new("org-1", "Acme", "user-1").into(),
            OrganizationUpdatedEvent::new("org-1", "Acme Corp").into(),
            OrganizationDeletedEvent::new("org-1", "Acme Corp").into(),
            UserCreatedEvent::new("user-1", "a@example.com", "A", "role-1", "Admin").into(),
            UserUpdatedEvent::new("user-1", "a@example.com", "Alice").into(),
            UserDeletedEvent::new("user-1", "a@example.com").into(),
            UserAddedToOrganizationEvent::new("user-1", "org-1", "role-1", "Admin").into(),
            UserRemovedFromOrganizationEvent::new("user-1", "org-1").into(),
            UserRoleChangedInOrganizationEvent::new("user-1", "org-1", "role-1", "role-2", "Viewer")
                .into(),
            RoleCreatedEvent::new("role-1", "org-1", "Admin", vec!["idea.write".to_string()])
                .into(),
            RoleUpdatedEvent::new("role-1", "org-1", "Admin", vec![]).into(),
            RoleDeletedEvent::new("role-1", "org-1", "Admin").into(),
        ]
    }

    #[test]
    fn every_catalog_tag_is_produced_exactly_once() {
        let produced: Vec<&str> = sample_events().iter().map(|e| e.event_type()).collect();
        assert_eq!(produced, event_types::ALL);
    }

    #[test]
    fn tags_follow_domain_dot_action_convention() {
        for tag in event_types::ALL {
            let (domain, action) = tag.split_once('.').expect("dot-separated tag");
            assert!(["organization", "user", "role"].contains(&domain), "{tag}");
            assert!(!action.is_empty() && !action.contains('.'), "{tag}");
        }
    }

    #[test]
    fn event_ids_are_unique_per_instance() {
        let ids: HashSet<EventId> = (0..1_000)
            .map(|_| UserDeletedEvent::new("user-1", "a@example.com").event_id())
            .collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn domain_event_delegates_metadata_to_variant() {
        let concrete = RoleDeletedEvent::new("role-9", "org-1", "Editor").with_version(4);
        let wrapped = DomainEvent::from(concrete.clone());

        assert_eq!(wrapped.event_id(), concrete.event_id());
        assert_eq!(wrapped.event_type(), event_types::ROLE_DELETED);
        assert_eq!(wrapped.aggregate_id(), "role-9");
        assert_eq!(wrapped.occurred_at(), concrete.occurred_at());
        assert_eq!(wrapped.version(), 4);
    }

    #[test]
    fn serializes_metadata_alongside_payload() {
        let event = DomainEvent::from(OrganizationDeletedEvent::new("org-7", "Globex"));
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event_type"], "organization.deleted");
        assert_eq!(json["aggregate_id"], "org-7");
        assert_eq!(json["organization_id"], "org-7");
        assert_eq!(json["name"], "Globex");
        assert_eq!(json["version"], 1);
    }

    #[test]
    fn every_event_round_trips_through_json() {
        for event in sample_events() {
            let json = serde_json::to_string(&event).unwrap();
            let back: DomainEvent = serde_json::from_str(&json).unwrap();

            assert_eq!(back, event);
            assert_eq!(back.event_id(), event.event_id());
        }
    }

    #[test]
    fn concrete_event_keeps_its_catalog_tag() {
        let original =
            RoleCreatedEvent::new("role-1", "org-1", "Admin", vec!["idea.write".to_string()])
                .with_version(3);

        let json = serde_json::to_string(&original).unwrap();
        let back: RoleCreatedEvent = serde_json::from_str(&json).unwrap();

        assert_eq!(back, original);
        assert_eq!(back.event_type(), event_types::ROLE_CREATED);
        assert_eq!(back.version(), 3);
    }

    #[test]
    fn unknown_or_missing_event_type_is_rejected() {
        let event = DomainEvent::from(UserDeletedEvent::new("user-1", "a@example.com"));
        let mut json = serde_json::to_value(&event).unwrap();

        json["event_type"] = "user.exploded".into();
        let err = serde_json::from_value::<DomainEvent>(json.clone()).unwrap_err();
        assert!(err.to_string().contains("user.exploded"), "{err}");
        assert!(serde_json::from_value::<UserDeletedEvent>(json.clone()).is_err());

        json.as_object_mut().unwrap().remove("event_type");
        assert!(serde_json::from_value::<DomainEvent>(json).is_err());
    }
}
