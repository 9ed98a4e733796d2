use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::draft::{optional_int, optional_text, require, require_one_of};
use crate::error::CrmError;
use crate::resource::{FormDraft, Resource, SortKey};
use crate::view::{descending_present_first, locale_compare};

pub const LEAD_SOURCES: &[&str] = &[
    "website",
    "referral",
    "social_media",
    "advertisement",
    "cold_call",
    "other",
];

pub const LEAD_STATUSES: &[&str] = &["new", "contacted", "qualified", "converted", "lost"];

/// A prospective buyer or seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub lead_source: String,
    pub lead_status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_max: Option<i64>,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inquiries: Option<Vec<LeadInquiry>>,
}

/// An inquiry a lead made about a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadInquiry {
    pub inquiry_id: i64,
    pub inquiry_type: String,
    pub inquiry_date: String,
    pub property_id: i64,
}

impl Lead {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LeadSort {
    /// Server order.
    #[default]
    Received,
    Name,
    Budget,
}

impl SortKey for LeadSort {
    fn all() -> &'static [Self] {
        &[LeadSort::Received, LeadSort::Name, LeadSort::Budget]
    }

    fn as_str(&self) -> &'static str {
        match self {
            LeadSort::Received => "received",
            LeadSort::Name => "name",
            LeadSort::Budget => "budget",
        }
    }
}

impl Resource for Lead {
    type SortKey = LeadSort;
    type Draft = LeadDraft;

    const COLLECTION: &'static str = "leads";
    const SINGULAR: &'static str = "lead";
    const SERVER_FILTERS: &'static [&'static str] = &["status", "budget_min", "budget_max"];

    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.email.as_str(),
            self.lead_source.as_str(),
        ]
    }

    fn compare(a: &Self, b: &Self, key: LeadSort) -> Ordering {
        match key {
            LeadSort::Received => Ordering::Equal,
            LeadSort::Name => locale_compare(&a.last_name, &b.last_name)
                .then_with(|| locale_compare(&a.first_name, &b.first_name)),
            LeadSort::Budget => descending_present_first(
                a.budget_max.map(|v| v as f64),
                b.budget_max.map(|v| v as f64),
            ),
        }
    }

    fn label(&self) -> String {
        self.full_name()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeadDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub lead_source: String,
    pub lead_status: String,
    pub budget_min: String,
    pub budget_max: String,
}

impl Default for LeadDraft {
    fn default() -> Self {
        LeadDraft {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            lead_source: "website".to_string(),
            lead_status: "new".to_string(),
            budget_min: String::new(),
            budget_max: String::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct LeadInput<'a> {
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    lead_source: &'a str,
    lead_status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    budget_min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    budget_max: Option<i64>,
}

impl FormDraft<Lead> for LeadDraft {
    fn from_record(record: &Lead) -> Self {
        LeadDraft {
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            email: record.email.clone(),
            phone: record.phone.clone().unwrap_or_default(),
            lead_source: record.lead_source.clone(),
            lead_status: record.lead_status.clone(),
            budget_min: record.budget_min.map(|v| v.to_string()).unwrap_or_default(),
            budget_max: record.budget_max.map(|v| v.to_string()).unwrap_or_default(),
        }
    }

    fn to_payload(&self) -> Result<serde_json::Value, CrmError> {
        require(&[
            ("First name", self.first_name.as_str()),
            ("Email", self.email.as_str()),
        ])?;
        if !self.email.contains('@') {
            return Err(CrmError::validation("Email address is invalid"));
        }
        require_one_of("lead source", &self.lead_source, LEAD_SOURCES)?;
        require_one_of("lead status", &self.lead_status, LEAD_STATUSES)?;

        let input = LeadInput {
            first_name: self.first_name.trim(),
            last_name: self.last_name.trim(),
            email: self.email.trim(),
            phone: optional_text(&self.phone),
            lead_source: &self.lead_source,
            lead_status: &self.lead_status,
            budget_min: optional_int(&self.budget_min),
            budget_max: optional_int(&self.budget_max),
        };
        serde_json::to_value(input).map_err(|e| CrmError::validation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::Criteria;
    use crate::view::derive_view;

    fn lead(id: i64, first: &str, last: &str, email: &str, source: &str) -> Lead {
        Lead {
            id,
            first_name: first.into(),
            last_name: last.into(),
            email: email.into(),
            phone: None,
            lead_source: source.into(),
            lead_status: "new".into(),
            budget_min: None,
            budget_max: None,
            created_at: "2025-06-01T10:00:00Z".into(),
            updated_at: None,
            inquiries: None,
        }
    }

    #[test]
    fn deserializes_without_optional_fields() {
        let json = serde_json::json!({
            "id": 7,
            "first_name": "Ana",
            "last_name": "Lopez",
            "email": "ana@example.com",
            "lead_source": "referral",
            "lead_status": "qualified",
            "created_at": "2025-06-01T10:00:00Z",
            "inquiries": [{
                "inquiry_id": 1,
                "inquiry_type": "showing",
                "inquiry_date": "2025-06-02",
                "property_id": 4
            }]
        });
        let lead: Lead = serde_json::from_value(json).unwrap();
        assert_eq!(lead.budget_min, None);
        assert_eq!(lead.inquiries.as_ref().map(Vec::len), Some(1));
        let back = serde_json::to_value(&lead).unwrap();
        assert!(back.get("phone").is_none());
    }

    #[test]
    fn search_covers_name_email_and_source() {
        let leads = vec![
            lead(1, "Ana", "Lopez", "ana@example.com", "referral"),
            lead(2, "Bo", "Martinez", "bo@example.com", "website"),
        ];
        let by_upper = derive_view(&leads, &Criteria::new().with_search("MARTINEZ"));
        let by_lower = derive_view(&leads, &Criteria::new().with_search("martinez"));
        assert_eq!(by_upper, by_lower);
        assert_eq!(by_upper.len(), 1);

        let by_source = derive_view(&leads, &Criteria::new().with_search("Refer"));
        assert_eq!(by_source[0].id, 1);
        let by_email = derive_view(&leads, &Criteria::new().with_search("bo@"));
        assert_eq!(by_email[0].id, 2);
    }

    #[test]
    fn received_sort_keeps_server_order() {
        let leads = vec![
            lead(3, "Zed", "Young", "z@x.io", "other"),
            lead(1, "Amy", "Adams", "a@x.io", "other"),
        ];
        let view = derive_view(&leads, &Criteria::new());
        assert_eq!(view.iter().map(|l| l.id).collect::<Vec<_>>(), vec![3, 1]);
        let view = derive_view(&leads, &Criteria::new().with_sort(LeadSort::Name));
        assert_eq!(view.iter().map(|l| l.id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn server_filters_become_query_params() {
        let criteria = Criteria::<LeadSort>::new()
            .with_filter("budget_max", "500000")
            .with_filter("status", "qualified")
            .with_filter("budget_min", "");
        assert_eq!(
            criteria.server_query::<Lead>(),
            vec![
                ("status".to_string(), "qualified".to_string()),
                ("budget_max".to_string(), "500000".to_string()),
            ]
        );
    }

    #[test]
    fn blank_required_fields_fail_validation() {
        let err = LeadDraft::default().to_payload().unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert_eq!(err.message(), "First name and email are required");
    }

    #[test]
    fn payload_drops_blank_optionals() {
        let draft = LeadDraft {
            first_name: "Jane".into(),
            email: "jane@example.com".into(),
            budget_max: "350000".into(),
            budget_min: "abc".into(),
            ..Default::default()
        };
        assert_eq!(
            draft.to_payload().unwrap(),
            serde_json::json!({
                "first_name": "Jane",
                "last_name": "",
                "email": "jane@example.com",
                "lead_source": "website",
                "lead_status": "new",
                "budget_max": 350000
            })
        );
    }

    #[test]
    fn delete_prompt_uses_full_name() {
        let l = lead(1, "Ana", "Lopez", "ana@example.com", "referral");
        assert_eq!(l.delete_prompt(), "Are you sure you want to delete Ana Lopez?");
    }

    #[test]
    fn unknown_status_is_rejected() {
        let draft = LeadDraft {
            first_name: "Jane".into(),
            email: "jane@example.com".into(),
            lead_status: "hot".into(),
            ..Default::default()
        };
        assert_eq!(
            draft.to_payload().unwrap_err().message(),
            "Unknown lead status 'hot'"
        );
    }
}
