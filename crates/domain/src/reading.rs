//! Readings: one device's latest sensor snapshot, and the ordered
//! [`ReadingSet`] the data provider returns.
//!
//! Every field of a [`Reading`] is optional. `null` is treated the same as an
//! absent field, so the firmware's habit of serialising NaN as `null` does not
//! break a cycle.

use std::collections::HashMap;
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// Battery charge level, kept exactly as written in the document.
///
/// `90.0` stays `90.0` and `1e2` stays `1e2`; the text is only checked to be
/// a JSON number.
#[derive(Debug, Clone)]
pub struct BatteryLevel(Box<RawValue>);

impl BatteryLevel {
    /// The level as written in the document.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.get()
    }
}

impl PartialEq for BatteryLevel {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl fmt::Display for BatteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for BatteryLevel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BatteryLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        serde_json::from_str::<serde_json::Number>(raw.get()).map_err(de::Error::custom)?;
        Ok(Self(raw))
    }
}

/// Battery state reported by a sensor.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Battery {
    /// Charge level.
    pub level: Option<BatteryLevel>,
    /// Battery voltage in volts.
    pub voltage: Option<f64>,
}

/// Object form of `battery`, using either `level` or `percentage`.
#[derive(Deserialize)]
struct DetailedBattery {
    #[serde(default, alias = "percentage")]
    level: Option<BatteryLevel>,
    #[serde(default)]
    voltage: Option<f64>,
}

/// Older firmware published the battery percentage as a bare number; newer
/// firmware sends an object. The raw text is inspected first so the level
/// keeps its original spelling in both shapes.
impl<'de> Deserialize<'de> for Battery {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        if raw.get().starts_with('{') {
            let DetailedBattery { level, voltage } =
                serde_json::from_str(raw.get()).map_err(de::Error::custom)?;
            Ok(Self { level, voltage })
        } else {
            let level = serde_json::from_str(raw.get()).map_err(de::Error::custom)?;
            Ok(Self {
                level: Some(level),
                voltage: None,
            })
        }
    }
}

/// The latest snapshot reported for one device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ReadingRepr")]
pub struct Reading {
    /// Display label.
    pub name: Option<String>,
    /// Temperature in degrees Celsius.
    pub temperature: Option<f64>,
    /// Relative humidity in percent.
    pub humidity: Option<f64>,
    /// Battery state.
    pub battery: Option<Battery>,
    /// Seconds since the device last reported.
    pub age: Option<f64>,
}

/// Wire shape of a reading. Some firmware reports the age as `last_update`;
/// when both are sent, `age` wins.
#[derive(Deserialize)]
struct ReadingRepr {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    temperature: Option<f64>,
    #[serde(default)]
    humidity: Option<f64>,
    #[serde(default)]
    battery: Option<Battery>,
    #[serde(default)]
    age: Option<f64>,
    #[serde(default)]
    last_update: Option<f64>,
}

impl From<ReadingRepr> for Reading {
    fn from(repr: ReadingRepr) -> Self {
        Self {
            name: repr.name,
            temperature: repr.temperature,
            humidity: repr.humidity,
            battery: repr.battery,
            age: repr.age.or(repr.last_update),
        }
    }
}

impl Reading {
    /// Display label, if one is set and non-empty.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    /// Battery level, if reported.
    #[must_use]
    pub fn battery_level(&self) -> Option<&BatteryLevel> {
        self.battery.as_ref().and_then(|battery| battery.level.as_ref())
    }

    /// Battery voltage, if reported.
    #[must_use]
    pub fn battery_voltage(&self) -> Option<f64> {
        self.battery.as_ref().and_then(|battery| battery.voltage)
    }
}

/// All current readings keyed by device identifier, in document order.
///
/// A `HashMap` would lose the order the provider sent, so the set keeps a
/// vector of pairs. When a key repeats, the first position wins and the last
/// value wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingSet {
    entries: Vec<(String, Reading)>,
}

impl ReadingSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON readings document.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if the bytes are not JSON, the top
    /// level is not an object, or any reading has the wrong shape.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Insert or replace the reading for `identifier`, keeping its position.
    pub fn insert(&mut self, identifier: impl Into<String>, reading: Reading) {
        let identifier = identifier.into();
        match self.entries.iter_mut().find(|(key, _)| *key == identifier) {
            Some((_, existing)) => *existing = reading,
            None => self.entries.push((identifier, reading)),
        }
    }

    /// Look up the reading for `identifier`.
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&Reading> {
        self.entries
            .iter()
            .find(|(key, _)| key == identifier)
            .map(|(_, reading)| reading)
    }

    /// Iterate `(identifier, reading)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Reading)> {
        self.entries
            .iter()
            .map(|(key, reading)| (key.as_str(), reading))
    }

    /// Number of devices in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no devices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Reading)> for ReadingSet {
    fn from_iter<I: IntoIterator<Item = (K, Reading)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (key, reading) in iter {
            set.insert(key, reading);
        }
        set
    }
}

impl<'de> Deserialize<'de> for ReadingSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ReadingSetVisitor)
    }
}

struct ReadingSetVisitor;

impl<'de> Visitor<'de> for ReadingSetVisitor {
    type Value = ReadingSet;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of device identifiers to readings")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries: Vec<(String, Reading)> =
            Vec::with_capacity(access.size_hint().unwrap_or(0));
        let mut positions: HashMap<String, usize> = HashMap::new();

        while let Some((key, reading)) = access.next_entry::<String, Reading>()? {
            if let Some(&index) = positions.get(&key) {
                entries[index].1 = reading;
            } else {
                positions.insert(key.clone(), entries.len());
                entries.push((key, reading));
            }
        }

        Ok(ReadingSet { entries })
    }
}

impl Serialize for ReadingSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, reading) in &self.entries {
            map.serialize_entry(key, reading)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ReadingSet {
        ReadingSet::from_json(json.as_bytes()).unwrap()
    }

    #[test]
    fn should_parse_full_reading() {
        let set = parse(
            r#"{"AA:BB": {"name":"Kitchen","temperature":21.34,"humidity":55.6,
                "battery":{"level":90,"voltage":3.01},"age":2}}"#,
        );
        let reading = set.get("AA:BB").unwrap();
        assert_eq!(reading.label(), Some("Kitchen"));
        assert_eq!(reading.temperature, Some(21.34));
        assert_eq!(reading.humidity, Some(55.6));
        assert_eq!(reading.battery_level().unwrap().to_string(), "90");
        assert_eq!(reading.battery_voltage(), Some(3.01));
        assert_eq!(reading.age, Some(2.0));
    }

    #[test]
    fn should_treat_missing_fields_as_absent() {
        let set = parse(r#"{"CC:DD": {"age": 200}}"#);
        let reading = set.get("CC:DD").unwrap();
        assert_eq!(reading.label(), None);
        assert_eq!(reading.temperature, None);
        assert_eq!(reading.humidity, None);
        assert_eq!(reading.battery, None);
        assert_eq!(reading.age, Some(200.0));
    }

    #[test]
    fn should_treat_null_fields_as_absent() {
        let set = parse(
            r#"{"CC:DD": {"name":null,"temperature":null,"battery":{"level":null,"voltage":null},"age":null}}"#,
        );
        let reading = set.get("CC:DD").unwrap();
        assert_eq!(reading.label(), None);
        assert_eq!(reading.temperature, None);
        assert_eq!(reading.battery_level(), None);
        assert_eq!(reading.battery_voltage(), None);
        assert_eq!(reading.age, None);
    }

    #[test]
    fn should_treat_empty_name_as_absent() {
        let set = parse(r#"{"CC:DD": {"name":""}}"#);
        assert_eq!(set.get("CC:DD").unwrap().label(), None);
    }

    #[test]
    fn should_accept_bare_battery_level() {
        let set = parse(r#"{"CC:DD": {"battery": 87}}"#);
        let reading = set.get("CC:DD").unwrap();
        assert_eq!(reading.battery_level().unwrap().to_string(), "87");
        assert_eq!(reading.battery_voltage(), None);
    }

    #[test]
    fn should_accept_percentage_alias_for_battery_level() {
        let set = parse(r#"{"CC:DD": {"battery": {"percentage": 64, "voltage": 2.9}}}"#);
        let reading = set.get("CC:DD").unwrap();
        assert_eq!(reading.battery_level().unwrap().to_string(), "64");
        assert_eq!(reading.battery_voltage(), Some(2.9));
    }

    #[test]
    fn should_accept_last_update_alias_for_age() {
        let set = parse(r#"{"CC:DD": {"last_update": 12, "last_seen": 1}}"#);
        assert_eq!(set.get("CC:DD").unwrap().age, Some(12.0));
    }

    #[test]
    fn should_keep_battery_level_verbatim() {
        let set = parse(r#"{"CC:DD": {"battery": {"level": 90.25}}}"#);
        let level = set.get("CC:DD").unwrap().battery_level().unwrap();
        assert_eq!(level.to_string(), "90.25");
    }

    #[test]
    fn should_keep_battery_level_spelling() {
        for level in ["90.0", "1e2", "90.250", "7"] {
            let set = parse(&format!(r#"{{"CC:DD": {{"battery": {{"level": {level}}}}}}}"#));
            let rendered = set.get("CC:DD").unwrap().battery_level().unwrap().to_string();
            assert_eq!(rendered, level);
        }
    }

    #[test]
    fn should_keep_bare_battery_level_spelling() {
        let set = parse(r#"{"CC:DD": {"battery": 64.50}}"#);
        assert_eq!(set.get("CC:DD").unwrap().battery_level().unwrap().as_str(), "64.50");
    }

    #[test]
    fn should_reject_non_numeric_battery_level() {
        assert!(ReadingSet::from_json(br#"{"AA": {"battery": {"level": "full"}}}"#).is_err());
        assert!(ReadingSet::from_json(br#"{"AA": {"battery": "full"}}"#).is_err());
    }

    #[test]
    fn should_prefer_age_over_last_update() {
        let set = parse(r#"{"CC:DD": {"last_update": 12, "age": 4}}"#);
        assert_eq!(set.get("CC:DD").unwrap().age, Some(4.0));
    }

    #[test]
    fn should_fall_back_to_last_update_when_age_is_null() {
        let set = parse(r#"{"CC:DD": {"age": null, "last_update": 12}}"#);
        assert_eq!(set.get("CC:DD").unwrap().age, Some(12.0));
    }

    #[test]
    fn should_serialize_battery_level_verbatim() {
        let set = parse(r#"{"CC:DD": {"battery": {"level": 1e2}}}"#);
        let json = serde_json::to_string(&set).unwrap();
        assert!(json.contains(r#""level":1e2"#), "{json}");
    }

    #[test]
    fn should_preserve_document_order() {
        let set = parse(r#"{"ZZ": {}, "AA": {}, "MM": {}}"#);
        let keys: Vec<&str> = set.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["ZZ", "AA", "MM"]);
    }

    #[test]
    fn should_keep_first_position_and_last_value_for_duplicate_keys() {
        let set = parse(r#"{"AA": {"age": 1}, "BB": {}, "AA": {"age": 9}}"#);
        let keys: Vec<&str> = set.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["AA", "BB"]);
        assert_eq!(set.get("AA").unwrap().age, Some(9.0));
    }

    #[test]
    fn should_parse_empty_document() {
        let set = parse("{}");
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn should_reject_non_json() {
        assert!(ReadingSet::from_json(b"<html>oops</html>").is_err());
    }

    #[test]
    fn should_reject_non_object_top_level() {
        assert!(ReadingSet::from_json(b"[1, 2, 3]").is_err());
    }

    #[test]
    fn should_reject_null_reading() {
        assert!(ReadingSet::from_json(br#"{"AA": null}"#).is_err());
    }

    #[test]
    fn should_reject_wrongly_typed_field() {
        assert!(ReadingSet::from_json(br#"{"AA": {"temperature": "warm"}}"#).is_err());
    }

    #[test]
    fn should_replace_value_in_place_on_insert() {
        let mut set = ReadingSet::new();
        set.insert("AA", Reading::default());
        set.insert("BB", Reading::default());
        set.insert(
            "AA",
            Reading {
                age: Some(4.0),
                ..Reading::default()
            },
        );
        let keys: Vec<&str> = set.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["AA", "BB"]);
        assert_eq!(set.get("AA").unwrap().age, Some(4.0));
    }

    #[test]
    fn should_serialize_in_document_order() {
        let set: ReadingSet = [("BB", Reading::default()), ("AA", Reading::default())]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&set).unwrap();
        assert!(json.find("BB").unwrap() < json.find("AA").unwrap());
    }
}
