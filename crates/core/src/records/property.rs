use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::draft::{
    number_to_field, optional_int, optional_number, optional_text, require, require_one_of,
    required_number,
};
use crate::error::CrmError;
use crate::resource::{FormDraft, Resource, SortKey};
use crate::view::{descending, locale_compare};

pub const PROPERTY_TYPES: &[&str] = &[
    "house",
    "condo",
    "townhouse",
    "apartment",
    "land",
    "commercial",
    "other",
];

pub const LISTING_STATUSES: &[&str] = &["active", "pending", "sold", "withdrawn"];

pub const US_STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA", "KS",
    "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ", "NM", "NY",
    "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA", "WV",
    "WI", "WY",
];

/// A listing managed on the properties page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: i64,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub square_feet: Option<i64>,
    pub listing_price: f64,
    pub listing_status: String,
    pub listing_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inquiries: Option<Vec<PropertyInquiry>>,
}

/// An inquiry about this property, denormalized with the lead's contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyInquiry {
    pub inquiry_id: i64,
    pub inquiry_type: String,
    pub inquiry_date: String,
    pub lead_id: i64,
    pub lead_name: String,
    pub lead_email: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PropertySort {
    /// Server order.
    #[default]
    Listed,
    Price,
    Address,
}

impl SortKey for PropertySort {
    fn all() -> &'static [Self] {
        &[
            PropertySort::Listed,
            PropertySort::Price,
            PropertySort::Address,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            PropertySort::Listed => "listed",
            PropertySort::Price => "price",
            PropertySort::Address => "address",
        }
    }
}

impl Resource for Property {
    type SortKey = PropertySort;
    type Draft = PropertyDraft;

    const COLLECTION: &'static str = "properties";
    const SINGULAR: &'static str = "property";
    const SERVER_FILTERS: &'static [&'static str] = &[
        "status",
        "min_price",
        "max_price",
        "property_type",
        "bedrooms",
        "bathrooms",
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.address.as_str(), self.city.as_str(), self.state.as_str()];
        if let Some(kind) = &self.property_type {
            fields.push(kind.as_str());
        }
        fields
    }

    fn compare(a: &Self, b: &Self, key: PropertySort) -> Ordering {
        match key {
            PropertySort::Listed => Ordering::Equal,
            PropertySort::Price => descending(a.listing_price, b.listing_price),
            PropertySort::Address => locale_compare(&a.address, &b.address),
        }
    }

    fn label(&self) -> String {
        self.address.clone()
    }

    fn delete_prompt(&self) -> String {
        format!(
            "Are you sure you want to delete the property at {}?",
            self.address
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDraft {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub property_type: String,
    pub bedrooms: String,
    pub bathrooms: String,
    pub square_feet: String,
    pub listing_price: String,
    pub listing_status: String,
    pub description: String,
}

impl Default for PropertyDraft {
    fn default() -> Self {
        PropertyDraft {
            address: String::new(),
            city: String::new(),
            state: "TX".to_string(),
            zip_code: String::new(),
            property_type: "house".to_string(),
            bedrooms: String::new(),
            bathrooms: String::new(),
            square_feet: String::new(),
            listing_price: String::new(),
            listing_status: "active".to_string(),
            description: String::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct PropertyInput<'a> {
    address: &'a str,
    city: &'a str,
    state: String,
    zip_code: &'a str,
    property_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    bedrooms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bathrooms: Option<serde_json::Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    square_feet: Option<i64>,
    listing_price: serde_json::Number,
    listing_status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl FormDraft<Property> for PropertyDraft {
    fn from_record(record: &Property) -> Self {
        PropertyDraft {
            address: record.address.clone(),
            city: record.city.clone(),
            state: record.state.clone(),
            zip_code: record.zip_code.clone(),
            property_type: record
                .property_type
                .clone()
                .unwrap_or_else(|| "house".to_string()),
            bedrooms: record.bedrooms.map(|v| v.to_string()).unwrap_or_default(),
            bathrooms: number_to_field(record.bathrooms),
            square_feet: record.square_feet.map(|v| v.to_string()).unwrap_or_default(),
            listing_price: number_to_field(Some(record.listing_price)),
            listing_status: record.listing_status.clone(),
            description: record.description.clone().unwrap_or_default(),
        }
    }

    fn to_payload(&self) -> Result<serde_json::Value, CrmError> {
        require(&[
            ("Address", self.address.as_str()),
            ("City", self.city.as_str()),
            ("State", self.state.as_str()),
            ("Zip code", self.zip_code.as_str()),
            ("Listing price", self.listing_price.as_str()),
        ])?;
        let listing_price = required_number(&self.listing_price, "Listing price")?;
        let state = self.state.trim().to_uppercase();
        require_one_of("state", &state, US_STATES)?;
        require_one_of("property type", &self.property_type, PROPERTY_TYPES)?;
        require_one_of("listing status", &self.listing_status, LISTING_STATUSES)?;

        let input = PropertyInput {
            address: self.address.trim(),
            city: self.city.trim(),
            state,
            zip_code: self.zip_code.trim(),
            property_type: &self.property_type,
            bedrooms: optional_int(&self.bedrooms),
            bathrooms: optional_number(&self.bathrooms),
            square_feet: optional_int(&self.square_feet),
            listing_price,
            listing_status: &self.listing_status,
            description: optional_text(&self.description),
        };
        serde_json::to_value(input).map_err(|e| CrmError::validation(e.to_string()))
    }
}
