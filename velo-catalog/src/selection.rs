use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::attribute::{Attribute, Chain, Choice, FrameFinish, FrameType, RimColor, Wheels};

/// Untyped selection as it arrives from outside: attribute key to option label.
pub type RawSelection = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Invalid value {value:?} for attribute {attribute}")]
    InvalidDomainValue { attribute: Attribute, value: String },

    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("Attribute {0} given more than once")]
    DuplicateAttribute(Attribute),
}

/// A partial or complete assignment of options to attributes.
///
/// Deserializes from a JSON object of attribute keys to option labels. `null`
/// means unset, and a key repeated in the object is `DuplicateAttribute`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSelection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_type: Option<FrameType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_finish: Option<FrameFinish>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wheels: Option<Wheels>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rim_color: Option<RimColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<Chain>,
}

impl AttributeSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection from `(attribute key, option label)` pairs in any order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, SelectionError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut selection = Self::new();
        for (key, value) in pairs {
            let attribute: Attribute = key.as_ref().parse()?;
            if selection.get(attribute).is_some() {
                return Err(SelectionError::DuplicateAttribute(attribute));
            }
            selection.set(Choice::parse(attribute, value.as_ref())?);
        }
        Ok(selection)
    }

    pub fn from_raw(raw: &RawSelection) -> Result<Self, SelectionError> {
        Self::from_pairs(raw.iter())
    }

    pub fn to_raw(&self) -> RawSelection {
        self.choices()
            .map(|choice| (choice.attribute().key().to_string(), choice.label().to_string()))
            .collect()
    }

    /// Builder-style `set`.
    pub fn with(mut self, choice: impl Into<Choice>) -> Self {
        self.set(choice);
        self
    }

    pub fn get(&self, attribute: Attribute) -> Option<Choice> {
        match attribute {
            Attribute::FrameType => self.frame_type.map(Choice::from),
            Attribute::FrameFinish => self.frame_finish.map(Choice::from),
            Attribute::Wheels => self.wheels.map(Choice::from),
            Attribute::RimColor => self.rim_color.map(Choice::from),
            Attribute::Chain => self.chain.map(Choice::from),
        }
    }

    pub fn set(&mut self, choice: impl Into<Choice>) {
        match choice.into() {
            Choice::FrameType(option) => self.frame_type = Some(option),
            Choice::FrameFinish(option) => self.frame_finish = Some(option),
            Choice::Wheels(option) => self.wheels = Some(option),
            Choice::RimColor(option) => self.rim_color = Some(option),
            Choice::Chain(option) => self.chain = Some(option),
        }
    }

    pub fn clear(&mut self, attribute: Attribute) {
        match attribute {
            Attribute::FrameType => self.frame_type = None,
            Attribute::FrameFinish => self.frame_finish = None,
            Attribute::Wheels => self.wheels = None,
            Attribute::RimColor => self.rim_color = None,
            Attribute::Chain => self.chain = None,
        }
    }

    /// The options that are set, in attribute order.
    pub fn choices(&self) -> impl Iterator<Item = Choice> + '_ {
        Attribute::ALL.into_iter().filter_map(|attribute| self.get(attribute))
    }

    pub fn is_empty(&self) -> bool {
        self.choices().next().is_none()
    }
}

impl<'de> Deserialize<'de> for AttributeSelection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SelectionVisitor;

        impl<'de> Visitor<'de> for SelectionVisitor {
            type Value = AttributeSelection;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of attribute keys to option labels")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                // Entries stay in document order so repeated keys are seen.
                let mut pairs = Vec::new();
                while let Some((key, value)) = map.next_entry::<String, Option<String>>()? {
                    if let Some(value) = value {
                        pairs.push((key, value));
                    }
                }
                AttributeSelection::from_pairs(pairs).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_map(SelectionVisitor)
    }
}
