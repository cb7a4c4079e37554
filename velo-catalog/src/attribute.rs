use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::selection::SelectionError;

/// The customizable dimensions of a bicycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Attribute {
    FrameType,
    FrameFinish,
    Wheels,
    RimColor,
    Chain,
}

impl Attribute {
    pub const ALL: [Attribute; 5] = [
        Attribute::FrameType,
        Attribute::FrameFinish,
        Attribute::Wheels,
        Attribute::RimColor,
        Attribute::Chain,
    ];

    /// Wire key used in selections, price tables and rule conditions.
    pub fn key(&self) -> &'static str {
        match self {
            Attribute::FrameType => "frameType",
            Attribute::FrameFinish => "frameFinish",
            Attribute::Wheels => "wheels",
            Attribute::RimColor => "rimColor",
            Attribute::Chain => "chain",
        }
    }

    /// Every option in this attribute's domain, in declaration order.
    pub fn options(&self) -> Vec<Choice> {
        match self {
            Attribute::FrameType => FrameType::ALL.iter().copied().map(Choice::from).collect(),
            Attribute::FrameFinish => FrameFinish::ALL.iter().copied().map(Choice::from).collect(),
            Attribute::Wheels => Wheels::ALL.iter().copied().map(Choice::from).collect(),
            Attribute::RimColor => RimColor::ALL.iter().copied().map(Choice::from).collect(),
            Attribute::Chain => Chain::ALL.iter().copied().map(Choice::from).collect(),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Attribute {
    type Err = SelectionError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        Attribute::ALL
            .iter()
            .copied()
            .find(|attribute| attribute.key() == key)
            .ok_or_else(|| SelectionError::UnknownAttribute(key.to_string()))
    }
}

/// Declares the closed option domain of one attribute.
macro_rules! attribute_options {
    (
        $(#[$meta:meta])*
        $name:ident for $attribute:ident {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = SelectionError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($label => Ok($name::$variant),)+
                    _ => Err(SelectionError::InvalidDomainValue {
                        attribute: Attribute::$attribute,
                        value: value.to_string(),
                    }),
                }
            }
        }

        impl From<$name> for Choice {
            fn from(option: $name) -> Self {
                Choice::$attribute(option)
            }
        }
    };
}

attribute_options! {
    FrameType for FrameType {
        FullSuspension => "Full-Suspension",
        Diamond => "Diamond",
        StepThrough => "Step-Through",
    }
}

attribute_options! {
    FrameFinish for FrameFinish {
        Matte => "Matte",
        Shiny => "Shiny",
    }
}

attribute_options! {
    Wheels for Wheels {
        Road => "Road Wheels",
        Mountain => "Mountain Wheels",
        FatBike => "Fat Bike Wheels",
    }
}

attribute_options! {
    RimColor for RimColor {
        Red => "Red",
        Black => "Black",
        Blue => "Blue",
    }
}

attribute_options! {
    Chain for Chain {
        SingleSpeed => "Single-Speed Chain",
        EightSpeed => "8-Speed Chain",
    }
}

/// One option of one attribute.
///
/// Serializes externally tagged by attribute key, e.g. `{"wheels": "Road Wheels"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Choice {
    FrameType(FrameType),
    FrameFinish(FrameFinish),
    Wheels(Wheels),
    RimColor(RimColor),
    Chain(Chain),
}

impl Choice {
    /// Runtime-checked construction from an attribute and an option label.
    pub fn parse(attribute: Attribute, value: &str) -> Result<Self, SelectionError> {
        Ok(match attribute {
            Attribute::FrameType => Choice::FrameType(value.parse()?),
            Attribute::FrameFinish => Choice::FrameFinish(value.parse()?),
            Attribute::Wheels => Choice::Wheels(value.parse()?),
            Attribute::RimColor => Choice::RimColor(value.parse()?),
            Attribute::Chain => Choice::Chain(value.parse()?),
        })
    }

    /// Every option of every attribute.
    pub fn all() -> impl Iterator<Item = Choice> {
        Attribute::ALL.into_iter().flat_map(|attribute| attribute.options())
    }

    pub fn attribute(&self) -> Attribute {
        match self {
            Choice::FrameType(_) => Attribute::FrameType,
            Choice::FrameFinish(_) => Attribute::FrameFinish,
            Choice::Wheels(_) => Attribute::Wheels,
            Choice::RimColor(_) => Attribute::RimColor,
            Choice::Chain(_) => Attribute::Chain,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Choice::FrameType(option) => option.label(),
            Choice::FrameFinish(option) => option.label(),
            Choice::Wheels(option) => option.label(),
            Choice::RimColor(option) => option.label(),
            Choice::Chain(option) => option.label(),
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {:?}", self.attribute(), self.label())
    }
}
