use crate::normalizer::normalize_name;
use crate::overlap::Interval;
use crate::parser;
use chrono::NaiveDateTime;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

/// Placeholder written whenever a field could not be extracted.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    FiveStar,
    FourStar,
    Other,
}

impl Category {
    pub fn from_hotel_name(name: &str) -> Self {
        if name.contains(parser::FIVE_STAR_MARKER) {
            Category::FiveStar
        } else if name.contains(parser::FOUR_STAR_MARKER) {
            Category::FourStar
        } else {
            Category::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::FiveStar => "5*",
            Category::FourStar => "4*",
            Category::Other => "Other",
        }
    }
}

/// A row type written to a snapshot file.
pub trait SnapshotRow {
    /// Header of the snapshot, in serialization order.
    const COLUMNS: &'static [&'static str];
}

/// One product as extracted from the Verychic API, before any reshaping.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelListing {
    pub name: String,
    pub destination_name: String,
    pub normalized_price: f64,
    pub discount: f64,
    pub offer_start_date: String,
    pub offer_end_date: String,
    pub retrieval_date: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerychicOffer {
    pub hotel_name: String,
    pub city: String,
    pub country: String,
    pub category: Category,
    pub price: f64,
    pub discount: f64,
    pub start_date: String,
    pub end_date: String,
    pub last_minute: bool,
}

// Column names follow the snapshots already on disk, the flag is "X" or empty
impl Serialize for VerychicOffer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("VerychicOffer", 9)?;
        state.serialize_field("hotel_name", &self.hotel_name)?;
        state.serialize_field("City", &self.city)?;
        state.serialize_field("Country", &self.country)?;
        state.serialize_field("Category", self.category.as_str())?;
        state.serialize_field("Price", &self.price)?;
        state.serialize_field("Discount", &self.discount)?;
        state.serialize_field("start_date", &self.start_date)?;
        state.serialize_field("end_date", &self.end_date)?;
        state.serialize_field("Dernière Minute", if self.last_minute { "X" } else { "" })?;
        state.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoyagePriveOffer {
    #[serde(rename = "Country")]
    pub destination: String,
    pub hotel_name: String,
    #[serde(rename = "Price")]
    pub price: String,
    pub time_remaining: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub start_date: NaiveDateTime,
    #[serde(serialize_with = "serialize_timestamp")]
    pub end_date: NaiveDateTime,
    #[serde(rename = "Exclusif", serialize_with = "serialize_yes_no")]
    pub exclusive: bool,
}

impl SnapshotRow for VerychicOffer {
    const COLUMNS: &'static [&'static str] = &[
        "hotel_name",
        "City",
        "Country",
        "Category",
        "Price",
        "Discount",
        "start_date",
        "end_date",
        "Dernière Minute",
    ];
}

impl SnapshotRow for VoyagePriveOffer {
    const COLUMNS: &'static [&'static str] = &[
        "Country",
        "hotel_name",
        "Price",
        "time_remaining",
        "start_date",
        "end_date",
        "Exclusif",
    ];
}

fn serialize_timestamp<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&parser::format_timestamp(value))
}

fn serialize_yes_no<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(if *value { "yes" } else { "no" })
}

/// A row of a snapshot file as seen by the comparator.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotOffer {
    pub hotel_name: String,
    pub normalized_name: String,
    pub interval: Option<Interval>,
}

impl SnapshotOffer {
    pub fn new(hotel_name: &str, start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        let interval = match (start, end) {
            (Some(start), Some(end)) => {
                let interval = Interval::new(start, end);
                if interval.is_none() {
                    warn!("Ignoring inverted date range for {}: {} > {}", hotel_name, start, end);
                }
                interval
            }
            _ => None,
        };

        Self {
            hotel_name: hotel_name.to_string(),
            normalized_name: normalize_name(hotel_name),
            interval,
        }
    }

    /// Blank names and the sentinel carry no identity and never match.
    pub fn has_identity(&self) -> bool {
        let trimmed = self.hotel_name.trim();
        !trimmed.is_empty() && trimmed != NOT_AVAILABLE
    }
}

// Only the three comparison columns are read, anything else in the file is ignored
impl<'de> Deserialize<'de> for SnapshotOffer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct SnapshotHelper {
            hotel_name: Option<String>,
            start_date: Option<String>,
            end_date: Option<String>,
        }

        let helper = SnapshotHelper::deserialize(deserializer)?;

        let start = helper.start_date.as_deref().and_then(parser::parse_snapshot_timestamp);
        let end = helper.end_date.as_deref().and_then(parser::parse_snapshot_timestamp);

        Ok(SnapshotOffer::new(
            helper.hotel_name.as_deref().unwrap_or_default(),
            start,
            end,
        ))
    }
}
