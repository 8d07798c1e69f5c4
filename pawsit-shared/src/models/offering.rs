/// Service offering model
///
/// An offering is a kind of care a sitter sells at an hourly price. The
/// table is called `services`; the Rust type is `Offering` to keep it apart
/// from the service layer.

use serde::{Deserialize, Serialize};

use super::{string_enum, ParseEnumError};

/// Kind of care offered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceType {
    #[serde(rename = "walking")]
    Walking,

    #[serde(rename = "boarding")]
    Boarding,

    #[serde(rename = "home-care")]
    HomeCare,
}

impl ServiceType {
    pub const ALL: [ServiceType; 3] = [
        ServiceType::Walking,
        ServiceType::Boarding,
        ServiceType::HomeCare,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Walking => "walking",
            ServiceType::Boarding => "boarding",
            ServiceType::HomeCare => "home-care",
        }
    }
}

string_enum!(ServiceType, "service type");

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Offering {
    pub id: i64,
    pub sitter_id: i64,
    #[sqlx(try_from = "String")]
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    pub price_per_hour: f64,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct CreateOffering {
    pub sitter_id: i64,
    pub service_type: ServiceType,
    pub price_per_hour: f64,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct UpdateOffering {
    pub service_type: ServiceType,
    pub price_per_hour: f64,
    pub description: String,
}

/// Search hit: the offering plus the sitter's name and average rating
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OfferingListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub offering: Offering,
    pub sitter_name: String,
    /// 0.0 when the sitter has no reviews
    pub sitter_rating: f64,
}

/// Optional filters for the public search
///
/// `location` matches the sitter's location as a case-insensitive substring.
/// Only offerings of approved sitters are returned, best rated first.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferingSearch {
    #[serde(rename = "type")]
    pub service_type: Option<ServiceType>,
    pub location: Option<String>,
}

/// Raw search query string, before the type is parsed
///
/// `?type=&location=` is what an empty search form submits, so blank values
/// mean "no filter" rather than a decode error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    #[serde(rename = "type")]
    pub service_type: Option<String>,
    pub location: Option<String>,
}

impl TryFrom<SearchParams> for OfferingSearch {
    type Error = ParseEnumError;

    fn try_from(params: SearchParams) -> Result<Self, Self::Error> {
        let non_blank = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let service_type = non_blank(params.service_type)
            .map(|t| t.parse::<ServiceType>())
            .transpose()?;

        Ok(OfferingSearch {
            service_type,
            location: non_blank(params.location),
        })
    }
}
