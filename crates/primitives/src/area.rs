#[cfg(test)]
#[path = "tests/area.rs"]
mod tests;

use core::fmt::{self, Formatter};

use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of one area node, unique across the whole tree.
///
/// Servers are free to hand out integers or strings; both sort into one
/// total order (all integers before all strings) so sibling lists stay
/// mergeable with a single cursor.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum AreaId {
    Num(u64),
    Name(String),
}

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(id) => write!(f, "{id}"),
            Self::Name(id) => f.write_str(id),
        }
    }
}

impl From<u64> for AreaId {
    fn from(id: u64) -> Self {
        Self::Num(id)
    }
}

impl From<&str> for AreaId {
    fn from(id: &str) -> Self {
        Self::Name(id.to_owned())
    }
}

impl From<String> for AreaId {
    fn from(id: String) -> Self {
        Self::Name(id)
    }
}

impl Serialize for AreaId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Num(id) => serializer.serialize_u64(*id),
            Self::Name(id) => serializer.serialize_str(id),
        }
    }
}

impl<'de> Deserialize<'de> for AreaId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = AreaId;

            fn expecting(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
                formatter.write_str("an integer or string area id")
            }

            fn visit_u64<E: de::Error>(self, id: u64) -> Result<Self::Value, E> {
                Ok(AreaId::Num(id))
            }

            fn visit_i64<E: de::Error>(self, id: i64) -> Result<Self::Value, E> {
                u64::try_from(id)
                    .map(AreaId::Num)
                    .map_err(|_| de::Error::invalid_value(de::Unexpected::Signed(id), &self))
            }

            fn visit_str<E: de::Error>(self, id: &str) -> Result<Self::Value, E> {
                Ok(AreaId::Name(id.to_owned()))
            }

            fn visit_string<E: de::Error>(self, id: String) -> Result<Self::Value, E> {
                Ok(AreaId::Name(id))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// One instruction against a node of the area tree.
///
/// Wire shape is the positional array `[id, label]` or `[id, label, children]`.
/// A `null` label deletes the node and everything under it; a present
/// `children` array marks the node internal and is merged recursively.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AreaUpdate {
    pub id: AreaId,
    pub label: Option<String>,
    pub children: Option<Vec<AreaUpdate>>,
}

impl AreaUpdate {
    #[must_use]
    pub fn leaf(id: impl Into<AreaId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: Some(label.into()),
            children: None,
        }
    }

    #[must_use]
    pub fn internal(
        id: impl Into<AreaId>,
        label: impl Into<String>,
        children: Vec<Self>,
    ) -> Self {
        Self {
            id: id.into(),
            label: Some(label.into()),
            children: Some(children),
        }
    }

    #[must_use]
    pub fn delete(id: impl Into<AreaId>) -> Self {
        Self {
            id: id.into(),
            label: None,
            children: None,
        }
    }

    #[must_use]
    pub const fn is_delete(&self) -> bool {
        self.label.is_none()
    }
}

impl Serialize for AreaUpdate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.children.is_some() { 3 } else { 2 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.id)?;
        seq.serialize_element(&self.label)?;
        if let Some(children) = &self.children {
            seq.serialize_element(children)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for AreaUpdate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct UpdateVisitor;

        impl<'de> Visitor<'de> for UpdateVisitor {
            type Value = AreaUpdate;

            fn expecting(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
                formatter.write_str("an area update array of 2 or 3 elements")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let id = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let label = seq
                    .next_element::<Option<String>>()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                let children = seq.next_element()?;

                if seq.next_element::<de::IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length(4, &self));
                }

                Ok(AreaUpdate {
                    id,
                    label,
                    children,
                })
            }
        }

        deserializer.deserialize_seq(UpdateVisitor)
    }
}
