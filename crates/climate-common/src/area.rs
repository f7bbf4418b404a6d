//! Areas of interest.
//!
//! An area is either a single administrative unit or a composite region
//! made of several units. Areas are configured as a mapping
//! `{region_name: {unit_id: display_name, ...}}`; the mapping's document
//! order is kept because it fixes the column order of the output table.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One named area and the administrative units it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaDefinition {
    /// Area name, used as the output column header.
    pub name: String,
    /// Unit identifier -> human-readable unit name.
    pub units: BTreeMap<String, String>,
}

impl AreaDefinition {
    /// A simple area covering exactly one administrative unit.
    pub fn single(
        name: impl Into<String>,
        unit_id: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        let mut units = BTreeMap::new();
        units.insert(unit_id.into(), display_name.into());
        Self {
            name: name.into(),
            units,
        }
    }

    /// A composite area covering the union of several units.
    pub fn composite<I, K, V>(name: impl Into<String>, units: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            units: units
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn unit_ids(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(String::as_str)
    }

    pub fn is_composite(&self) -> bool {
        self.units.len() > 1
    }
}

/// Ordered, uniquely named set of areas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaSet {
    areas: Vec<AreaDefinition>,
}

impl AreaSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an area. Returns `false` (and keeps the existing one) when an
    /// area with the same name is already present.
    pub fn push(&mut self, area: AreaDefinition) -> bool {
        if self.get(&area.name).is_some() {
            return false;
        }
        self.areas.push(area);
        true
    }

    /// Builder form of [`AreaSet::push`].
    pub fn with_area(mut self, area: AreaDefinition) -> Self {
        self.push(area);
        self
    }

    pub fn get(&self, name: &str) -> Option<&AreaDefinition> {
        self.areas.iter().find(|a| a.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AreaDefinition> {
        self.areas.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.areas.iter().map(|a| a.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}

impl<'a> IntoIterator for &'a AreaSet {
    type Item = &'a AreaDefinition;
    type IntoIter = std::slice::Iter<'a, AreaDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.areas.iter()
    }
}

impl Serialize for AreaSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.areas.len()))?;
        for area in &self.areas {
            map.serialize_entry(&area.name, &area.units)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AreaSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AreaSetVisitor;

        impl<'de> Visitor<'de> for AreaSetVisitor {
            type Value = AreaSet;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of area name to {unit_id: display_name}")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<AreaSet, A::Error> {
                let mut seen = HashSet::new();
                let mut set = AreaSet::new();

                while let Some((name, units)) =
                    access.next_entry::<String, BTreeMap<String, String>>()?
                {
                    if !seen.insert(name.clone()) {
                        return Err(de::Error::custom(format!("duplicate area '{}'", name)));
                    }
                    set.areas.push(AreaDefinition { name, units });
                }

                Ok(set)
            }
        }

        deserializer.deserialize_map(AreaSetVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_and_composite() {
        let state = AreaDefinition::single("Louisiana", "22", "Louisiana");
        assert!(!state.is_composite());
        assert_eq!(state.unit_ids().collect::<Vec<_>>(), vec!["22"]);

        let region = AreaDefinition::composite(
            "Southeast",
            [("22071", "Orleans Parish"), ("22051", "Jefferson Parish")],
        );
        assert!(region.is_composite());
        assert_eq!(region.unit_ids().collect::<Vec<_>>(), vec!["22051", "22071"]);
    }

    #[test]
    fn test_push_rejects_duplicate_names() {
        let mut set = AreaSet::new();
        assert!(set.push(AreaDefinition::single("A", "1", "one")));
        assert!(!set.push(AreaDefinition::single("A", "2", "two")));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("A").unwrap().unit_ids().next(), Some("1"));
    }

    #[test]
    fn test_yaml_preserves_document_order() {
        let yaml = r#"
Northwest:
  "22017": Caddo Parish
Acadiana:
  "22001": Acadia Parish
  "22055": Lafayette Parish
Central:
  "22079": Rapides Parish
"#;
        let set: AreaSet = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(set.names(), vec!["Northwest", "Acadiana", "Central"]);
        assert_eq!(set.get("Acadiana").unwrap().units.len(), 2);
    }

    #[test]
    fn test_json_round_trip_keeps_order() {
        let set = AreaSet::new()
            .with_area(AreaDefinition::single("Zeta", "9", "nine"))
            .with_area(AreaDefinition::single("Alpha", "1", "one"));

        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"Zeta":{"9":"nine"},"Alpha":{"1":"one"}}"#);

        let back: AreaSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_duplicate_area_rejected() {
        let json = r#"{"A":{"1":"one"},"A":{"2":"two"}}"#;
        let err = serde_json::from_str::<AreaSet>(json).unwrap_err();
        assert!(err.to_string().contains("duplicate area"));
    }
}
