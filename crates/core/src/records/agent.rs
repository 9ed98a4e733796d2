use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::draft::{optional_int, optional_number, require};
use crate::enrichment::EnrichmentPayload;
use crate::error::CrmError;
use crate::resource::{FormDraft, Resource, SortKey};
use crate::view::{descending, locale_compare};

/// A team member tracked on the agents page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: i64,
    pub name: String,
    pub specialty: String,
    pub rating: f64,
    pub leads: i64,
    pub deals: i64,
    /// Page quote merged in from enrichment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AgentSort {
    #[default]
    Rating,
    Name,
    Leads,
    Deals,
}

impl SortKey for AgentSort {
    fn all() -> &'static [Self] {
        &[
            AgentSort::Rating,
            AgentSort::Name,
            AgentSort::Leads,
            AgentSort::Deals,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            AgentSort::Rating => "rating",
            AgentSort::Name => "name",
            AgentSort::Leads => "leads",
            AgentSort::Deals => "deals",
        }
    }
}

impl Resource for Agent {
    type SortKey = AgentSort;
    type Draft = AgentDraft;

    const COLLECTION: &'static str = "agents";
    const SINGULAR: &'static str = "agent";
    const SERVER_FILTERS: &'static [&'static str] = &[];

    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.specialty.as_str()]
    }

    fn compare(a: &Self, b: &Self, key: AgentSort) -> Ordering {
        match key {
            AgentSort::Name => locale_compare(&a.name, &b.name),
            AgentSort::Rating => descending(a.rating, b.rating),
            AgentSort::Leads => b.leads.cmp(&a.leads),
            AgentSort::Deals => b.deals.cmp(&a.deals),
        }
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    /// `specialty` matches exactly (ignoring case); `min_rating` keeps agents
    /// rated at or above the value.
    fn matches_filter(&self, name: &str, value: &str) -> bool {
        match name {
            "specialty" => self.specialty.eq_ignore_ascii_case(value.trim()),
            "min_rating" => match value.trim().parse::<f64>() {
                Ok(min) => self.rating >= min,
                Err(_) => true,
            },
            _ => true,
        }
    }

    fn enrich(&mut self, insights: &EnrichmentPayload) {
        self.quote = insights.quote.clone();
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentDraft {
    pub name: String,
    pub specialty: String,
    pub rating: String,
    pub leads: String,
    pub deals: String,
}

#[derive(Debug, Serialize)]
struct AgentInput<'a> {
    name: &'a str,
    specialty: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    rating: Option<serde_json::Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    leads: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deals: Option<i64>,
}

impl FormDraft<Agent> for AgentDraft {
    fn from_record(record: &Agent) -> Self {
        AgentDraft {
            name: record.name.clone(),
            specialty: record.specialty.clone(),
            rating: crate::draft::number_to_field(Some(record.rating)),
            leads: record.leads.to_string(),
            deals: record.deals.to_string(),
        }
    }

    fn to_payload(&self) -> Result<serde_json::Value, CrmError> {
        require(&[("Name", self.name.as_str()), ("Specialty", self.specialty.as_str())])?;
        let input = AgentInput {
            name: self.name.trim(),
            specialty: self.specialty.trim(),
            rating: optional_number(&self.rating),
            leads: optional_int(&self.leads),
            deals: optional_int(&self.deals),
        };
        serde_json::to_value(input).map_err(|e| CrmError::validation(e.to_string()))
    }
}
