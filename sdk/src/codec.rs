//! # Message Codec & Type Registry
//!
//! Every message on the wire travels inside an enclosure pairing a routing
//! tag with the message body: `{"type": "auric/MsgSend", "value": {...}}`.
//! The tag table is a closed, static registry keyed by [`MsgKind`]. There
//! is no runtime type-name introspection anywhere: adding a message kind
//! means adding an enum variant and a registration, and the compiler points
//! at every match that needs updating.

use crate::account::AccountId;
use crate::coin::Coin;
use crate::identity::IdentityDocument;
use crate::powerup::PowerUpRequest;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// A bank transfer between two accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSend {
    pub from_address: AccountId,
    pub to_address: AccountId,
    pub amount: Vec<Coin>,
}

/// An invitation crediting a new account's onboarding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgInviteUser {
    pub recipient: AccountId,
    pub sender: AccountId,
}

/// The closed set of messages the SDK can put on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Send(MsgSend),
    SetIdentity(IdentityDocument),
    RequestPowerUp(PowerUpRequest),
    InviteUser(MsgInviteUser),
}

/// Discriminator for [`Msg`], used as the registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MsgKind {
    Send,
    SetIdentity,
    RequestPowerUp,
    InviteUser,
}

impl Msg {
    /// The registry key for this message.
    pub fn kind(&self) -> MsgKind {
        match self {
            Self::Send(_) => MsgKind::Send,
            Self::SetIdentity(_) => MsgKind::SetIdentity,
            Self::RequestPowerUp(_) => MsgKind::RequestPowerUp,
            Self::InviteUser(_) => MsgKind::InviteUser,
        }
    }

    /// Serialize the message body (the enclosure's `value` field).
    pub fn to_wire_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            Self::Send(m) => serde_json::to_value(m),
            Self::SetIdentity(m) => serde_json::to_value(m),
            Self::RequestPowerUp(m) => serde_json::to_value(m),
            Self::InviteUser(m) => serde_json::to_value(m),
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// One entry in the codec registry.
///
/// `Interface` entries register an abstract message family. They carry no
/// tag and never match a concrete value; they exist so the registration
/// table mirrors the chain's own codec layout, where `Msg` itself is
/// registered alongside its implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Concrete {
        kind: MsgKind,
        tag: &'static str,
    },
    Interface {
        name: &'static str,
    },
}

/// The chain's standard codec table.
pub const STANDARD_REGISTRATIONS: &[Registration] = &[
    Registration::Interface { name: "Msg" },
    Registration::Concrete {
        kind: MsgKind::Send,
        tag: "auric/MsgSend",
    },
    Registration::Concrete {
        kind: MsgKind::SetIdentity,
        tag: "auric/MsgSetIdentity",
    },
    Registration::Concrete {
        kind: MsgKind::RequestPowerUp,
        tag: "auric/MsgRequestPowerUp",
    },
    Registration::Concrete {
        kind: MsgKind::InviteUser,
        tag: "auric/MsgInviteUser",
    },
];

/// Lookup table from message kind to wire tag.
#[derive(Debug, Clone)]
pub struct TypeMapping {
    tags: HashMap<MsgKind, String>,
}

impl TypeMapping {
    /// Build a mapping from a registration table.
    ///
    /// # Panics
    ///
    /// Panics if the same kind is registered twice. Registration tables are
    /// compiled-in constants, so a duplicate is a programming error caught
    /// at client construction, not a runtime condition to recover from.
    pub fn from_registrations(registrations: &[Registration]) -> Self {
        let mut tags = HashMap::new();
        for registration in registrations {
            match registration {
                Registration::Concrete { kind, tag } => {
                    if tags.insert(*kind, (*tag).to_string()).is_some() {
                        panic!("duplicate codec registration for {kind:?}");
                    }
                }
                Registration::Interface { .. } => {}
            }
        }
        Self { tags }
    }

    /// The chain's standard mapping.
    pub fn standard() -> Self {
        Self::from_registrations(STANDARD_REGISTRATIONS)
    }

    /// The wire tag for a message kind, or `""` if unregistered.
    pub fn tag_for(&self, kind: MsgKind) -> &str {
        self.tags.get(&kind).map(String::as_str).unwrap_or("")
    }

    /// The wire tag for an optional message value. `None` maps to `""`,
    /// matching the chain codec's treatment of absent values.
    pub fn tag_for_value(&self, msg: Option<&Msg>) -> &str {
        match msg {
            Some(m) => self.tag_for(m.kind()),
            None => "",
        }
    }
}

impl Default for TypeMapping {
    fn default() -> Self {
        Self::standard()
    }
}

// ---------------------------------------------------------------------------
// Enclosures
// ---------------------------------------------------------------------------

/// The tagged wrapper every message travels in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEnclosure {
    #[serde(rename = "type")]
    pub type_tag: String,
    pub value: serde_json::Value,
}

impl MessageEnclosure {
    /// Wrap a message using the given tag table.
    pub fn enclose(mapping: &TypeMapping, msg: &Msg) -> Result<Self, serde_json::Error> {
        Ok(Self {
            type_tag: mapping.tag_for(msg.kind()).to_string(),
            value: msg.to_wire_value()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
