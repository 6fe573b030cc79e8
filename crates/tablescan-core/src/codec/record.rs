use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

/// Value of a decoded field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(u32),
    Bytes(Vec<u8>),
}

impl FieldValue {
    pub fn as_int(&self) -> Option<u32> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Bytes(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            Self::Int(_) => None,
        }
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Int(value)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Int(v) => serializer.serialize_u32(*v),
            Self::Bytes(b) => b.serialize(serializer),
        }
    }
}

/// A decoded record: named field values in layout order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Record::set`].
    pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a field, replacing any previous value under the same name.
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn int(&self, name: &str) -> Option<u32> {
        self.get(name).and_then(FieldValue::as_int)
    }

    pub fn bytes(&self, name: &str) -> Option<&[u8]> {
        self.get(name).and_then(FieldValue::as_bytes)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_in_place() {
        let mut record = Record::new().with("hp", 10u32).with("gold", 5u32);
        record.set("hp", 20u32);
        assert_eq!(record.int("hp"), Some(20));
        assert_eq!(record.len(), 2);
        let names: Vec<_> = record.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["hp", "gold"]);
    }

    #[test]
    fn test_typed_accessors() {
        let record = Record::new()
            .with("hp", 7u32)
            .with("skill_data", vec![1u8, 2, 3]);
        assert_eq!(record.int("skill_data"), None);
        assert_eq!(record.bytes("skill_data"), Some(&[1u8, 2, 3][..]));
        assert_eq!(record.bytes("hp"), None);
        assert_eq!(record.get("missing"), None);
    }

    #[test]
    fn test_serialize_as_map() {
        let record = Record::new().with("hp", 32u32).with("skill", vec![1u8, 2]);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"hp":32,"skill":[1,2]}"#);
    }
}
