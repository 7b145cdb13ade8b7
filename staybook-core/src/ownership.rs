//! Single-owner authorization.
//!
//! Mutations of an owned resource are allowed only for the identity recorded
//! as its owner. Creation goes the other way: the owner or booker field of a
//! new record is always taken from the session, never from the payload.

use staybook_shared::{
    Booking, BookingDraft, IdentityRef, NewBooking, NewPlace, Place, PlaceAttributes,
};
use uuid::Uuid;

use crate::{CoreError, CoreResult};

/// A resource with exactly one owning identity.
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

impl Owned for Place {
    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

impl Owned for Booking {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    NotOwner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(DenyReason),
}

impl Decision {
    /// `Denied` becomes [`CoreError::Forbidden`] so handlers can `?` it
    /// before touching storage.
    pub fn into_result(self) -> CoreResult<()> {
        match self {
            Decision::Allowed => Ok(()),
            Decision::Denied(DenyReason::NotOwner) => Err(CoreError::Forbidden),
        }
    }
}

/// Ids are compared as UUID values, so two spellings of the same id
/// (upper/lower case hex, braces) never produce a false denial.
pub fn authorize_mutation<R: Owned + ?Sized>(identity: &IdentityRef, resource: &R) -> Decision {
    if resource.owner_id() == identity.id {
        Decision::Allowed
    } else {
        Decision::Denied(DenyReason::NotOwner)
    }
}

/// A caller payload that becomes a persisted record once attributed.
pub trait Attributable {
    type Record;

    fn attribute_to(self, owner: Uuid) -> Self::Record;
}

impl Attributable for PlaceAttributes {
    type Record = NewPlace;

    fn attribute_to(self, owner: Uuid) -> NewPlace {
        NewPlace {
            owner_id: owner,
            attributes: self,
        }
    }
}

impl Attributable for BookingDraft {
    type Record = NewBooking;

    fn attribute_to(self, owner: Uuid) -> NewBooking {
        NewBooking {
            user_id: owner,
            draft: self,
        }
    }
}

/// Build the record to persist from the authenticated identity and the
/// sanitized payload. The payload types have no owner field to begin with.
pub fn attribute_creation<P: Attributable>(identity: &IdentityRef, payload: P) -> P::Record {
    payload.attribute_to(identity.id)
}
