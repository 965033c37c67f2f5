//! The message envelope relayed between clients.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::ConnectionId;

/// A `from` or `to` header value.
///
/// Clients may put anything there. Strings are connection ids; any other
/// value is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Address {
    Id(ConnectionId),
    Opaque(Value),
}

impl Address {
    pub fn as_id(&self) -> Option<&ConnectionId> {
        match self {
            Address::Id(id) => Some(id),
            Address::Opaque(_) => None,
        }
    }
}

impl From<ConnectionId> for Address {
    fn from(id: ConnectionId) -> Self {
        Address::Id(id)
    }
}

impl From<&str> for Address {
    fn from(id: &str) -> Self {
        Address::Id(ConnectionId::from(id))
    }
}

/// Null, `false`, `0` and `""` count as absent; other strings become ids and
/// everything else is kept opaque.
fn lenient_address<'de, D>(deserializer: D) -> Result<Option<Address>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => None,
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(Address::Id(ConnectionId::from(s))),
        Some(other) => Some(Address::Opaque(other)),
    })
}

/// A relayed message: a fixed routing header plus opaque application fields.
///
/// The relay reads `from` and `to` and never looks inside `fields`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Sender. Defaulted by the server when missing, never overwritten.
    #[serde(
        default,
        deserialize_with = "lenient_address",
        skip_serializing_if = "Option::is_none"
    )]
    pub from: Option<Address>,
    /// Recipient, unicast only.
    #[serde(
        default,
        deserialize_with = "lenient_address",
        skip_serializing_if = "Option::is_none"
    )]
    pub to: Option<Address>,
    /// Application fields, flattened next to the header on the wire.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Envelope {
    /// Build an envelope from application fields only.
    pub fn with_fields(fields: Map<String, Value>) -> Self {
        Self {
            from: None,
            to: None,
            fields,
        }
    }

    /// Whether the envelope names a sender. An empty id counts as unset.
    pub fn has_sender(&self) -> bool {
        match &self.from {
            Some(Address::Id(id)) => !id.is_empty(),
            Some(Address::Opaque(_)) => true,
            None => false,
        }
    }

    /// Set `from` to `sender` unless the client already supplied one.
    ///
    /// A client-supplied `from` is kept even when it differs from the real
    /// sender: the relay does not authenticate identities.
    pub fn default_sender(&mut self, sender: &ConnectionId) {
        if !self.has_sender() {
            self.from = Some(Address::Id(sender.clone()));
        }
    }

    /// The recipient id, if `to` is a non-empty string.
    pub fn recipient(&self) -> Option<&ConnectionId> {
        self.to
            .as_ref()
            .and_then(Address::as_id)
            .filter(|to| !to.is_empty())
    }
}
