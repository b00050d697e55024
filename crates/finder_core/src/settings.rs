use std::collections::BTreeMap;

use finder_logging::finder_warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key under which the settings live in the persisted key/value store.
pub const SETTINGS_KEY: &str = "finder.presentation";
pub const SETTINGS_VERSION: u32 = 1;
pub const MIN_COLUMN_WIDTH: u32 = 60;
pub const MIN_ROW_HEIGHT: u32 = 24;
pub const DEFAULT_ROW_HEIGHT: u32 = 36;

/// Resizable table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Article,
    Manufacturer,
    Alias,
    SubmittedManufacturer,
    Status,
    Confidence,
    Service,
    Source,
    Created,
    Produces,
    Website,
    Aliases,
    Country,
}

impl Column {
    pub const ALL: [Column; 13] = [
        Column::Article,
        Column::Manufacturer,
        Column::Alias,
        Column::SubmittedManufacturer,
        Column::Status,
        Column::Confidence,
        Column::Service,
        Column::Source,
        Column::Created,
        Column::Produces,
        Column::Website,
        Column::Aliases,
        Column::Country,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Column::Article => "article",
            Column::Manufacturer => "manufacturer",
            Column::Alias => "alias",
            Column::SubmittedManufacturer => "submitted",
            Column::Status => "status",
            Column::Confidence => "confidence",
            Column::Service => "service",
            Column::Source => "source",
            Column::Created => "created",
            Column::Produces => "produces",
            Column::Website => "website",
            Column::Aliases => "aliases",
            Column::Country => "country",
        }
    }

    pub fn from_key(key: &str) -> Option<Column> {
        Column::ALL
            .into_iter()
            .find(|column| column.key().eq_ignore_ascii_case(key.trim()))
    }

    pub const fn default_width(self) -> u32 {
        match self {
            Column::Article => 160,
            Column::Manufacturer => 180,
            Column::Alias | Column::SubmittedManufacturer => 150,
            Column::Status => 100,
            Column::Confidence => 90,
            Column::Service => 130,
            Column::Source => 240,
            Column::Created => 140,
            Column::Produces => 220,
            Column::Website => 200,
            Column::Aliases => 180,
            Column::Country => 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    pub fn from_key(key: &str) -> Option<Self> {
        serde_json::from_value(Value::String(key.trim().to_ascii_lowercase())).ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    Compact,
    #[default]
    Comfortable,
    Spacious,
}

impl Density {
    pub fn from_key(key: &str) -> Option<Self> {
        serde_json::from_value(Value::String(key.trim().to_ascii_lowercase())).ok()
    }
}

/// Table layout preferences, independent of any record data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationSettings {
    column_widths: BTreeMap<Column, u32>,
    row_height: u32,
    pub font_size: FontSize,
    pub density: Density,
    pub fullscreen: bool,
    pub fit_to_screen: bool,
}

impl Default for PresentationSettings {
    fn default() -> Self {
        Self {
            column_widths: Column::ALL
                .into_iter()
                .map(|column| (column, column.default_width()))
                .collect(),
            row_height: DEFAULT_ROW_HEIGHT,
            font_size: FontSize::default(),
            density: Density::default(),
            fullscreen: false,
            fit_to_screen: false,
        }
    }
}

#[derive(Serialize)]
struct PersistedSettings<'a> {
    version: u32,
    column_widths: BTreeMap<&'static str, u32>,
    row_height: u32,
    font_size: &'a FontSize,
    density: &'a Density,
    fullscreen: bool,
    fit_to_screen: bool,
}

impl PresentationSettings {
    pub fn column_width(&self, column: Column) -> u32 {
        self.column_widths
            .get(&column)
            .copied()
            .unwrap_or_else(|| column.default_width())
    }

    /// Stores `width` floored at [`MIN_COLUMN_WIDTH`] and returns the stored value.
    pub fn set_column_width(&mut self, column: Column, width: i64) -> u32 {
        let width = width.clamp(i64::from(MIN_COLUMN_WIDTH), i64::from(u32::MAX)) as u32;
        self.column_widths.insert(column, width);
        width
    }

    pub fn row_height(&self) -> u32 {
        self.row_height
    }

    pub fn set_row_height(&mut self, height: u32) -> u32 {
        self.row_height = height.max(MIN_ROW_HEIGHT);
        self.row_height
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let persisted = PersistedSettings {
            version: SETTINGS_VERSION,
            column_widths: self
                .column_widths
                .iter()
                .map(|(column, width)| (column.key(), *width))
                .collect(),
            row_height: self.row_height,
            font_size: &self.font_size,
            density: &self.density,
            fullscreen: self.fullscreen,
            fit_to_screen: self.fit_to_screen,
        };
        serde_json::to_string(&persisted)
    }

    /// Decodes persisted settings field by field. Anything missing or malformed
    /// keeps its default; nothing here fails the whole load.
    pub fn from_json(raw: &str) -> Self {
        let mut settings = Self::default();
        let fields = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(fields)) => fields,
            Ok(other) => {
                finder_warn!("Persisted settings are not an object ({}); using defaults", kind(&other));
                return settings;
            }
            Err(err) => {
                finder_warn!("Persisted settings are not valid JSON: {}; using defaults", err);
                return settings;
            }
        };

        if let Some(version) = fields.get("version").and_then(Value::as_u64) {
            if version > u64::from(SETTINGS_VERSION) {
                finder_warn!(
                    "Persisted settings version {} is newer than {}; loading known fields",
                    version,
                    SETTINGS_VERSION
                );
            }
        }

        match fields.get("column_widths") {
            Some(Value::Object(widths)) => {
                for (key, width) in widths {
                    match (Column::from_key(key), width.as_i64()) {
                        (Some(column), Some(width)) => {
                            settings.set_column_width(column, width);
                        }
                        _ => finder_warn!("Ignoring persisted width {}={}", key, width),
                    }
                }
            }
            Some(other) => finder_warn!("Ignoring persisted column_widths of type {}", kind(other)),
            None => {}
        }

        if let Some(height) = field::<u32>(&fields, "row_height") {
            settings.set_row_height(height);
        }
        if let Some(font_size) = field(&fields, "font_size") {
            settings.font_size = font_size;
        }
        if let Some(density) = field(&fields, "density") {
            settings.density = density;
        }
        if let Some(fullscreen) = field(&fields, "fullscreen") {
            settings.fullscreen = fullscreen;
        }
        if let Some(fit) = field(&fields, "fit_to_screen") {
            settings.fit_to_screen = fit;
        }
        settings
    }
}

fn field<T: DeserializeOwned>(fields: &Map<String, Value>, name: &str) -> Option<T> {
    let value = fields.get(name)?;
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            finder_warn!("Ignoring persisted {}={}: {}", name, value, err);
            None
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
