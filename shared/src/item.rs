use serde::{Deserialize, Deserializer};

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// One facility as rendered into the page by the server. Read-only on the client.
///
/// Page data is loosely typed: ids arrive as numbers or strings, coordinates as
/// numeric strings, numbers, `null` or empty strings. Everything is normalised
/// here so the rest of the crate only sees `String` ids and `Option<f64>`
/// coordinates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DisplayItem {
    #[serde(deserialize_with = "loose_text")]
    pub id: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub name: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub address: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub phone: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub formatted_phone: String,
    #[serde(default, deserialize_with = "loose_coordinate")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "loose_coordinate")]
    pub longitude: Option<f64>,
}

impl DisplayItem {
    /// Marker position, present only when both coordinates are.
    pub fn position(&self) -> Option<LatLng> {
        Some(LatLng {
            lat: self.latitude?,
            lng: self.longitude?,
        })
    }
}

/// An item id as the page renders it, number or string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemId(pub String);

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(ItemId(Loose::deserialize(deserializer)?.into_text()))
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Loose {
    fn into_text(self) -> String {
        match self {
            Loose::Int(v) => v.to_string(),
            Loose::Float(v) if v.is_finite() && v.fract() == 0.0 => format!("{}", v as i64),
            Loose::Float(v) => v.to_string(),
            Loose::Text(v) => v,
        }
    }

    fn into_coordinate(self) -> Option<f64> {
        let value = match self {
            Loose::Int(v) => v as f64,
            Loose::Float(v) => v,
            Loose::Text(v) => v.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

fn loose_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Loose>::deserialize(deserializer)?
        .map(Loose::into_text)
        .unwrap_or_default())
}

fn loose_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Loose>::deserialize(deserializer)?.and_then(Loose::into_coordinate))
}
