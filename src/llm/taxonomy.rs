//! The closed three-class olive disease taxonomy.
//!
//! The model is only allowed to answer with one of these labels. The wire
//! strings must match the dataset class names exactly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiseaseClass {
    #[serde(rename = "Aculus olearius")]
    AculusOlearius,
    #[serde(rename = "Olive Peacock Spot")]
    OlivePeacockSpot,
    #[serde(rename = "Healthy")]
    Healthy,
}

impl DiseaseClass {
    /// Dataset order. The prompt and the class list both follow it.
    pub const ALL: [DiseaseClass; 3] = [
        DiseaseClass::AculusOlearius,
        DiseaseClass::OlivePeacockSpot,
        DiseaseClass::Healthy,
    ];

    /// Exact label used on the wire and in the dataset.
    pub fn label(self) -> &'static str {
        match self {
            DiseaseClass::AculusOlearius => "Aculus olearius",
            DiseaseClass::OlivePeacockSpot => "Olive Peacock Spot",
            DiseaseClass::Healthy => "Healthy",
        }
    }

    pub fn common_name(self) -> &'static str {
        match self {
            DiseaseClass::AculusOlearius => "Olive bud mite",
            DiseaseClass::OlivePeacockSpot => "Olive peacock spot",
            DiseaseClass::Healthy => "Healthy",
        }
    }

    /// What the class looks like on a leaf or fruit.
    pub fn visual_signature(self) -> &'static str {
        match self {
            DiseaseClass::AculusOlearius => {
                "Sickle-shaped curling and deformation of the leaves, rust-coloured or brownish discoloration."
            }
            DiseaseClass::OlivePeacockSpot => {
                "Caused by Spilocaea oleaginea. Distinct dark spots on the upper leaf surface made of concentric rings, like a peacock's eye."
            }
            DiseaseClass::Healthy => {
                "Clean, spotless, undeformed vivid green leaves or smooth fruit."
            }
        }
    }

    /// One-line summary for the class list on the upload screen.
    pub fn summary(self) -> &'static str {
        match self {
            DiseaseClass::AculusOlearius => "Rust-coloured deformation of the leaf.",
            DiseaseClass::OlivePeacockSpot => "Fungal disease caused by Spilocaea oleaginea.",
            DiseaseClass::Healthy => "Clean tissue with no visible symptoms.",
        }
    }

    pub fn is_healthy(self) -> bool {
        self == DiseaseClass::Healthy
    }
}

impl fmt::Display for DiseaseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DiseaseClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiseaseClass::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| format!("unknown class label: {:?}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_back() {
        for class in DiseaseClass::ALL {
            assert_eq!(class.label().parse::<DiseaseClass>(), Ok(class));
        }
    }

    #[test]
    fn label_match_is_exact() {
        assert!("healthy".parse::<DiseaseClass>().is_err());
        assert!("Olive Leaf Spot".parse::<DiseaseClass>().is_err());
    }

    #[test]
    fn serde_uses_dataset_labels() {
        let json = serde_json::to_string(&DiseaseClass::OlivePeacockSpot).unwrap();
        assert_eq!(json, "\"Olive Peacock Spot\"");
        let parsed: DiseaseClass = serde_json::from_str("\"Aculus olearius\"").unwrap();
        assert_eq!(parsed, DiseaseClass::AculusOlearius);
    }
}
