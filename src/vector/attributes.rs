/*
This file is part of the stormcatchments library.
Authors: Thomas Ott
Created: 05/03/2026
Last Modified: 14/10/2026
License: MIT

NOTE: Attribute values attached to input infrastructure features. These mirror
the column types of the attribute table the features were read from.
*/

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldData {
    Int(i32),
    Int64(i64),
    Real(f64),
    Text(String),
    Bool(bool),
    Null,
}

impl FieldData {
    /// The value as a type code used to look up sink/source classification.
    /// Integer-valued reals are accepted since many attribute tables store
    /// codes as floating point numbers.
    pub fn type_code(&self) -> Option<String> {
        match self {
            FieldData::Int(v) => Some(v.to_string()),
            FieldData::Int64(v) => Some(v.to_string()),
            FieldData::Real(v) if v.fract() == 0f64 => Some((*v as i64).to_string()),
            FieldData::Real(v) => Some(v.to_string()),
            FieldData::Text(s) => Some(s.trim().to_string()),
            FieldData::Bool(_) | FieldData::Null => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldData::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FieldData::Int(_) => "Int",
            FieldData::Int64(_) => "Int64",
            FieldData::Real(_) => "Real",
            FieldData::Text(_) => "Text",
            FieldData::Bool(_) => "Bool",
            FieldData::Null => "Null",
        }
    }
}

impl fmt::Display for FieldData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldData::Int(v) => write!(f, "{}", v),
            FieldData::Int64(v) => write!(f, "{}", v),
            FieldData::Real(v) => write!(f, "{}", v),
            FieldData::Text(s) => write!(f, "{}", s),
            FieldData::Bool(b) => write!(f, "{}", b),
            FieldData::Null => write!(f, "null"),
        }
    }
}
