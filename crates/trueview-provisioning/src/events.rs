//! The inbound CRM event envelope.

use serde::Deserialize;
use serde_json::Value;

/// Event classes the orchestrator acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventClass {
    /// A confirmed booking: provision the client if unknown.
    BookingConfirmed,
    /// Metadata refresh for an existing project.
    ProjectUpdated,
    /// Anything else: acknowledged and dropped.
    Unrecognized,
}

/// Webhook envelope as delivered by the CRM.
///
/// Ephemeral: never persisted as its own entity. The client email plus
/// event class is the idempotency key against the Client record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingEvent {
    pub event_type: String,
    pub client: ClientInfo,
    #[serde(default)]
    pub project: Option<ProjectInfo>,
}

/// Client block of the envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub business_name: Option<String>,
}

/// Project block of the envelope. Opaque to the core beyond pass-through:
/// it is re-serialized verbatim into the store's details column.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
}

impl BookingEvent {
    /// Classify the event type string.
    #[must_use]
    pub fn classify(&self) -> EventClass {
        match self.event_type.as_str() {
            "project.booked" | "invoice.paid" | "contract.signed" => EventClass::BookingConfirmed,
            "project.updated" => EventClass::ProjectUpdated,
            _ => EventClass::Unrecognized,
        }
    }

    /// The raw project block as JSON, for opaque storage.
    #[must_use]
    pub fn project_details(&self) -> Value {
        self.project
            .as_ref()
            .and_then(|p| serde_json::to_value(p).ok())
            .unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(event_type: &str) -> BookingEvent {
        serde_json::from_value(serde_json::json!({
            "eventType": event_type,
            "client": {"name": "Jordan", "email": "a@x.com"},
            "project": {"serviceType": "aerial-survey", "totalAmount": 4200.0}
        }))
        .unwrap()
    }

    #[test]
    fn booking_confirmation_classes() {
        for event_type in ["project.booked", "invoice.paid", "contract.signed"] {
            assert_eq!(parse(event_type).classify(), EventClass::BookingConfirmed);
        }
    }

    #[test]
    fn update_and_unknown_classes() {
        assert_eq!(parse("project.updated").classify(), EventClass::ProjectUpdated);
        assert_eq!(parse("client.archived").classify(), EventClass::Unrecognized);
    }

    #[test]
    fn deserializes_camel_case_envelope() {
        let event: BookingEvent = serde_json::from_str(
            r#"{
                "eventType": "project.booked",
                "client": {"name": "Jordan", "email": "a@x.com",
                           "phone": "555-0100", "businessName": "Acme Fields"},
                "project": {"serviceType": "aerial-survey", "name": "North Field",
                            "scheduledDate": "2025-06-01", "package": "premium",
                            "totalAmount": 4200.0}
            }"#,
        )
        .unwrap();

        assert_eq!(event.client.business_name.as_deref(), Some("Acme Fields"));
        assert_eq!(
            event.project.as_ref().unwrap().service_type.as_deref(),
            Some("aerial-survey")
        );
    }

    #[test]
    fn missing_project_block_is_tolerated() {
        let event: BookingEvent = serde_json::from_str(
            r#"{"eventType": "project.booked", "client": {"name": "J", "email": "a@x.com"}}"#,
        )
        .unwrap();
        assert!(event.project.is_none());
        assert_eq!(event.project_details(), Value::Null);
    }

    #[test]
    fn details_round_trip_keeps_camel_case() {
        let details = parse("project.booked").project_details();
        assert_eq!(details["serviceType"], "aerial-survey");
        assert_eq!(details["totalAmount"], 4200.0);
    }
}
