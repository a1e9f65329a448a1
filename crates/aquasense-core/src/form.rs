//! Questionnaire form state and validation.
//!
//! The questionnaire collects ten answers as raw text. Seven of them are
//! numeric and three are yes/no choices; nothing is coerced until
//! [`validate`] has accepted the whole form.

use crate::error::{AquaError, Result};
use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Error shown for a numeric field that is empty, unparseable, infinite or
/// negative.
pub const NUMBER_ERROR: &str = "Please enter a valid number";

/// Error shown for a yes/no field without a valid choice.
pub const YES_NO_ERROR: &str = "Please select Yes or No";

/// Kind of answer a field expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Non-negative number.
    Numeric,

    /// Exactly `"yes"` or `"no"`.
    YesNo,
}

/// One of the ten questionnaire fields, in questionnaire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    /// Household size.
    People,
    /// Number of children.
    Children,
    /// Average daily temperature in °C.
    Temperature,
    /// Whether water-saving devices are installed.
    WaterSavingDevices,
    /// Showers per day.
    ShowersPerDay,
    /// Minutes per shower.
    TimePerShower,
    /// Washing machine runs per week.
    WashingPerWeek,
    /// Whether rainwater is harvested.
    RainwaterHarvesting,
    /// Whether taps are often left running.
    TapsRunning,
    /// The household's own estimate of daily usage in litres.
    EstimatedUsage,
}

impl FormField {
    /// All fields in questionnaire order.
    pub const ALL: [FormField; 10] = [
        FormField::People,
        FormField::Children,
        FormField::Temperature,
        FormField::WaterSavingDevices,
        FormField::ShowersPerDay,
        FormField::TimePerShower,
        FormField::WashingPerWeek,
        FormField::RainwaterHarvesting,
        FormField::TapsRunning,
        FormField::EstimatedUsage,
    ];

    /// Wire and storage name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::People => "people",
            FormField::Children => "children",
            FormField::Temperature => "temperature",
            FormField::WaterSavingDevices => "waterSavingDevices",
            FormField::ShowersPerDay => "showersPerDay",
            FormField::TimePerShower => "timePerShower",
            FormField::WashingPerWeek => "washingPerWeek",
            FormField::RainwaterHarvesting => "rainwaterHarvesting",
            FormField::TapsRunning => "tapsRunning",
            FormField::EstimatedUsage => "estimatedUsage",
        }
    }

    /// Question text shown next to the input.
    pub fn label(&self) -> &'static str {
        match self {
            FormField::People => "How many people live in your home?",
            FormField::Children => "How many children?",
            FormField::Temperature => "What's your average daily temperature? (°C)",
            FormField::WaterSavingDevices => "Do you use water-saving devices?",
            FormField::ShowersPerDay => "How many showers per day?",
            FormField::TimePerShower => "Avg. time per shower? (minutes)",
            FormField::WashingPerWeek => "Washing machine uses per week?",
            FormField::RainwaterHarvesting => "Do you use rainwater harvesting?",
            FormField::TapsRunning => "Do you leave taps running often?",
            FormField::EstimatedUsage => "Estimated total daily water usage (liters)?",
        }
    }

    /// Kind of answer the field expects.
    pub fn kind(&self) -> FieldKind {
        match self {
            FormField::WaterSavingDevices
            | FormField::RainwaterHarvesting
            | FormField::TapsRunning => FieldKind::YesNo,
            _ => FieldKind::Numeric,
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormField {
    type Err = AquaError;

    fn from_str(s: &str) -> Result<Self> {
        FormField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| AquaError::UnknownField(s.to_string()))
    }
}

/// In-progress questionnaire answers, stored as raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    values: BTreeMap<FormField, String>,
}

impl FormState {
    /// Creates a form with every field empty.
    pub fn new() -> Self {
        Self {
            values: FormField::ALL
                .into_iter()
                .map(|field| (field, String::new()))
                .collect(),
        }
    }

    /// Updates the field named `name`, leaving all others untouched.
    ///
    /// # Errors
    ///
    /// Returns `AquaError::UnknownField` if `name` is not a questionnaire field.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let field = name.parse::<FormField>()?;
        self.set(field, value);
        Ok(())
    }

    /// Updates a single field.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    /// Returns the raw text of a field.
    pub fn get(&self, field: FormField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or_default()
    }

    /// Coerces a numeric field, or `None` if it does not hold a valid number.
    pub fn numeric(&self, field: FormField) -> Option<f64> {
        parse_number(self.get(field))
    }

    /// Iterates fields and raw values in questionnaire order.
    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.values.iter().map(|(field, value)| (*field, value.as_str()))
    }

    /// Validates the whole form. See [`validate`].
    pub fn validate(&self) -> ValidationErrors {
        validate(self)
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for FormState {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.as_str(), value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FormState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
        let mut form = FormState::new();
        for (name, value) in raw {
            // Keys written by older forms are ignored
            if let Ok(field) = name.parse::<FormField>() {
                form.set(field, value);
            }
        }
        Ok(form)
    }
}

/// Per-field validation messages; an absent field is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<FormField, &'static str>,
}

impl ValidationErrors {
    /// Returns `true` when the form may be submitted.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of invalid fields.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Message for a field, if it is invalid.
    pub fn get(&self, field: FormField) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    /// Returns `true` if the field is invalid.
    pub fn contains(&self, field: FormField) -> bool {
        self.errors.contains_key(&field)
    }

    /// Invalid fields and their messages in questionnaire order.
    pub fn iter(&self) -> impl Iterator<Item = (FormField, &'static str)> + '_ {
        self.errors.iter().map(|(field, message)| (*field, *message))
    }
}

/// Validates every field of the form.
///
/// Numeric fields must hold a number that is not negative; yes/no fields
/// must hold exactly `"yes"` or `"no"`. The result is computed from scratch
/// on every call.
pub fn validate(form: &FormState) -> ValidationErrors {
    let errors = FormField::ALL
        .into_iter()
        .filter_map(|field| {
            let value = form.get(field);
            match field.kind() {
                FieldKind::Numeric if parse_number(value).is_none() => Some((field, NUMBER_ERROR)),
                FieldKind::YesNo if value != "yes" && value != "no" => Some((field, YES_NO_ERROR)),
                _ => None,
            }
        })
        .collect();

    ValidationErrors { errors }
}

/// Parses a finite, non-negative number, ignoring surrounding whitespace.
fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    trimmed
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n >= 0.0)
}
