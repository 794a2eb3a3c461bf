pub mod user;

use chrono::{DateTime, Duration, DurationRound, Utc};
use uuid::Uuid;

pub trait Entity {
    fn ident(&self) -> Uuid;
    fn created(&self) -> DateTime<Utc>;
}

/// Data used to restore a entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityData {
    pub(in crate::domain) id: Uuid,
    pub(in crate::domain) created: DateTime<Utc>,
}

impl EntityData {
    /// Identity of a entity that is about to be persisted for the first time.
    ///
    /// The creation time is truncated to the microsecond precision of the store,
    /// so the value handed back on creation is the one later read back.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created: now.duration_trunc(Duration::microseconds(1)).unwrap_or(now),
        }
    }
}

macro_rules! impl_entity {
    ($entity:ty) => {
        impl crate::domain::entity::Entity for $entity {
            fn ident(&self) -> uuid::Uuid {
                self.data.id
            }

            fn created(&self) -> chrono::DateTime<chrono::Utc> {
                self.data.created
            }
        }
    };
}

macro_rules! state_ref {
    ($prop:ident, $rtrn:ty) => {
        pub fn $prop(&self) -> &$rtrn {
            &self.state.$prop
        }
    };
}

pub(crate) use impl_entity;
pub(crate) use state_ref;
