//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;
use std::str::FromStr;

use ipnetwork::Ipv4Network;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::yang::TryFromYang;

// Instance path of a data node.
//
// Example: /frr-ripd:ripd/instance/offset-list[interface='eth0'][direction='in']
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct DataPath(Vec<PathSegment>);

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PathSegment {
    pub name: String,
    pub keys: Vec<(String, String)>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(untagged)]
pub enum DataValue {
    Bool(bool),
    Uint(u64),
    String(String),
}

// Configuration node as supplied by the transaction coordinator.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct DataNode {
    pub path: DataPath,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<DataValue>,
}

// ===== impl DataPath =====

impl DataPath {
    // Returns the schema path, that is, the path with all list keys removed.
    pub fn schema_path(&self) -> String {
        self.0.iter().fold(String::new(), |mut path, segment| {
            path.push('/');
            path.push_str(&segment.name);
            path
        })
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn parent(&self) -> Option<DataPath> {
        match self.0.len() {
            0 => None,
            len => Some(DataPath(self.0[..len - 1].to_vec())),
        }
    }

    // Returns the path itself followed by all of its ancestors, deepest first.
    pub fn ancestors(&self) -> impl Iterator<Item = DataPath> + '_ {
        (1..=self.0.len())
            .rev()
            .map(|len| DataPath(self.0[..len].to_vec()))
    }

    // Returns whether `other` is this path or one of its ancestors.
    pub fn starts_with(&self, other: &DataPath) -> bool {
        self.0.len() >= other.0.len() && self.0[..other.0.len()] == other.0
    }

    #[must_use]
    pub fn join(&self, segment: PathSegment) -> DataPath {
        let mut segments = self.0.clone();
        segments.push(segment);
        DataPath(segments)
    }

    // Looks up a list key, starting from the deepest segment.
    pub fn list_key(&self, name: &str) -> Option<&str> {
        self.0.iter().rev().find_map(|segment| segment.key(name))
    }
}

impl std::fmt::Display for DataPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for segment in &self.0 {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for DataPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidPath(s.to_owned());

        let mut chars = s.chars().peekable();
        let mut segments = vec![];
        while let Some(c) = chars.next() {
            if c != '/' {
                return Err(invalid());
            }

            // Node name.
            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if c == '[' || c == '/' {
                    break;
                }
                name.push(c);
                chars.next();
            }
            if name.is_empty() {
                return Err(invalid());
            }

            // Key predicates.
            let mut keys = vec![];
            while chars.next_if_eq(&'[').is_some() {
                let mut key = String::new();
                loop {
                    match chars.next() {
                        Some('=') => break,
                        Some(c) => key.push(c),
                        None => return Err(invalid()),
                    }
                }
                let quote = match chars.next() {
                    Some(q @ ('\'' | '"')) => q,
                    _ => return Err(invalid()),
                };
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some(c) if c == quote => break,
                        Some(c) => value.push(c),
                        None => return Err(invalid()),
                    }
                }
                if chars.next() != Some(']') || key.is_empty() {
                    return Err(invalid());
                }
                keys.push((key, value));
            }

            segments.push(PathSegment { name, keys });
        }

        if segments.is_empty() {
            return Err(invalid());
        }

        Ok(DataPath(segments))
    }
}

impl TryFrom<String> for DataPath {
    type Error = Error;

    fn try_from(path: String) -> Result<Self, Self::Error> {
        path.parse()
    }
}

impl From<DataPath> for String {
    fn from(path: DataPath) -> String {
        path.to_string()
    }
}

// ===== impl PathSegment =====

impl PathSegment {
    pub fn new(name: impl Into<String>) -> Self {
        PathSegment {
            name: name.into(),
            keys: vec![],
        }
    }

    pub fn key(&self, name: &str) -> Option<&str> {
        self.keys
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl std::fmt::Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        for (key, value) in &self.keys {
            if value.contains('\'') {
                write!(f, "[{}=\"{}\"]", key, value)?;
            } else {
                write!(f, "[{}='{}']", key, value)?;
            }
        }
        Ok(())
    }
}

// ===== impl DataValue =====

impl std::fmt::Display for DataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataValue::Bool(value) => write!(f, "{}", value),
            DataValue::Uint(value) => write!(f, "{}", value),
            DataValue::String(value) => write!(f, "{}", value),
        }
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> DataValue {
        DataValue::Bool(value)
    }
}

impl From<u8> for DataValue {
    fn from(value: u8) -> DataValue {
        DataValue::Uint(value.into())
    }
}

impl From<u16> for DataValue {
    fn from(value: u16) -> DataValue {
        DataValue::Uint(value.into())
    }
}

impl From<u32> for DataValue {
    fn from(value: u32) -> DataValue {
        DataValue::Uint(value.into())
    }
}

impl From<u64> for DataValue {
    fn from(value: u64) -> DataValue {
        DataValue::Uint(value)
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> DataValue {
        DataValue::String(value)
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> DataValue {
        DataValue::String(value.to_owned())
    }
}

// ===== impl DataNode =====

impl DataNode {
    pub fn new(path: &str, value: Option<DataValue>) -> Result<Self, Error> {
        let path = path.parse()?;
        Ok(DataNode { path, value })
    }

    // Returns the node value. Leaf-list entries carry their value in the
    // "." key predicate of the last path segment.
    pub fn value(&self) -> Result<DataValue, Error> {
        if let Some(value) = &self.value {
            return Ok(value.clone());
        }
        self.path
            .last()
            .and_then(|segment| segment.key("."))
            .map(DataValue::from)
            .ok_or_else(|| self.invalid("missing value"))
    }

    pub fn get_bool(&self) -> Result<bool, Error> {
        match self.value()? {
            DataValue::Bool(value) => Ok(value),
            DataValue::String(value) => {
                value.parse().map_err(|_| self.invalid("expected boolean"))
            }
            DataValue::Uint(..) => Err(self.invalid("expected boolean")),
        }
    }

    pub fn get_u8(&self) -> Result<u8, Error> {
        let value = self.get_u64()?;
        u8::try_from(value).map_err(|_| self.invalid("value out of range"))
    }

    pub fn get_u16(&self) -> Result<u16, Error> {
        let value = self.get_u64()?;
        u16::try_from(value).map_err(|_| self.invalid("value out of range"))
    }

    pub fn get_u32(&self) -> Result<u32, Error> {
        let value = self.get_u64()?;
        u32::try_from(value).map_err(|_| self.invalid("value out of range"))
    }

    pub fn get_u64(&self) -> Result<u64, Error> {
        match self.value()? {
            DataValue::Uint(value) => Ok(value),
            DataValue::String(value) => {
                value.parse().map_err(|_| self.invalid("expected integer"))
            }
            DataValue::Bool(..) => Err(self.invalid("expected integer")),
        }
    }

    pub fn get_string(&self) -> Result<String, Error> {
        Ok(self.value()?.to_string())
    }

    pub fn get_ipv4(&self) -> Result<Ipv4Addr, Error> {
        self.get_string()?
            .parse()
            .map_err(|_| self.invalid("expected IPv4 address"))
    }

    pub fn get_prefix4(&self) -> Result<Ipv4Network, Error> {
        let value = self.get_string()?;
        parse_prefix4(&value).ok_or_else(|| self.invalid("expected IPv4 prefix"))
    }

    pub fn get_enum<T: TryFromYang>(&self) -> Result<T, Error> {
        let value = self.get_string()?;
        T::try_from_yang(&value)
            .ok_or_else(|| self.invalid("unknown enumeration value"))
    }

    pub fn key_string(&self, name: &str) -> Result<String, Error> {
        self.path
            .list_key(name)
            .map(str::to_owned)
            .ok_or_else(|| self.invalid("missing list key"))
    }

    pub fn key_prefix4(&self, name: &str) -> Result<Ipv4Network, Error> {
        let value = self.key_string(name)?;
        parse_prefix4(&value).ok_or_else(|| self.invalid("expected IPv4 prefix"))
    }

    pub fn key_enum<T: TryFromYang>(&self, name: &str) -> Result<T, Error> {
        let value = self.key_string(name)?;
        T::try_from_yang(&value)
            .ok_or_else(|| self.invalid("unknown enumeration value"))
    }

    fn invalid(&self, reason: &str) -> Error {
        Error::SchemaInvalid(format!("{}: {}", self.path, reason))
    }
}

// ===== helper functions =====

// Parses an IPv4 prefix, clearing the host bits.
fn parse_prefix4(value: &str) -> Option<Ipv4Network> {
    let prefix = value.parse::<Ipv4Network>().ok()?;
    Ipv4Network::new(prefix.network(), prefix.prefix()).ok()
}

// ===== unit tests =====
