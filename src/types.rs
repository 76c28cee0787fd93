//! Records exchanged with the gateway backend.
//!
//! Field names follow the backend's camelCase JSON. All of these are
//! read-only snapshots: the backend owns them and the client never edits
//! one in place.

use serde::{Deserialize, Serialize};

use crate::error::DeskError;

/// `lastReply` value used by the backend when an operator answered last.
pub const SUPPORT_SENDER: &str = "support";

/// Ticket severity as sent by the backend (0, 1 or 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Urgency {
    #[default]
    Normal,
    High,
    Critical,
}

impl Urgency {
    pub fn as_num(self) -> u8 {
        match self {
            Urgency::Normal => 0,
            Urgency::High => 1,
            Urgency::Critical => 2,
        }
    }

    pub fn from_num(n: u8) -> Option<Self> {
        match n {
            0 => Some(Urgency::Normal),
            1 => Some(Urgency::High),
            2 => Some(Urgency::Critical),
            _ => None,
        }
    }

    /// Cycle used by the new-ticket form.
    pub fn next(self) -> Self {
        match self {
            Urgency::Normal => Urgency::High,
            Urgency::High => Urgency::Critical,
            Urgency::Critical => Urgency::Normal,
        }
    }
}

enum_display_fromstr!(
    Urgency,
    DeskError::invalid_severity,
    {
        Normal => "normal",
        High => "high",
        Critical => "critical",
    }
);

impl TryFrom<u8> for Urgency {
    type Error = DeskError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Urgency::from_num(n).ok_or(DeskError::UrgencyOutOfRange(n))
    }
}

impl From<Urgency> for u8 {
    fn from(urgency: Urgency) -> Self {
        urgency.as_num()
    }
}

/// Open/closed status derived from `isActive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketStatus {
    Open,
    Closed,
}

enum_display!(TicketStatus, { Open => "open", Closed => "closed" });

impl From<bool> for TicketStatus {
    fn from(is_active: bool) -> Self {
        if is_active {
            TicketStatus::Open
        } else {
            TicketStatus::Closed
        }
    }
}

/// A support ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub ticket_id: String,
    pub title: String,
    pub date_created: String,
    pub date_updated: String,
    pub is_active: bool,
    pub urgency: Urgency,
    #[serde(default)]
    pub last_reply: String,
}

impl Ticket {
    pub fn status(&self) -> TicketStatus {
        TicketStatus::from(self.is_active)
    }

    /// True when support answered last on an open ticket.
    pub fn awaiting_customer(&self) -> bool {
        self.is_active && self.last_reply == SUPPORT_SENDER
    }

    /// Short label describing who the ticket is waiting on.
    pub fn reply_label(&self) -> &'static str {
        if !self.is_active {
            "-"
        } else if self.awaiting_customer() {
            "awaiting you"
        } else {
            "awaiting support"
        }
    }
}

/// One message in a ticket thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub name: String,
    pub message: String,
    pub date_created: String,
}

impl Message {
    pub fn is_from_support(&self) -> bool {
        self.name == SUPPORT_SENDER
    }
}

/// A merchant store attached to the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub store_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub date_created: String,
}

/// Quoted price of a currency in a fiat currency.
///
/// `price` is kept as the backend's decimal string so it is shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyPrice {
    pub currency: String,
    pub fiat: String,
    pub price: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgency_labels() {
        assert_eq!(Urgency::Normal.to_string(), "normal");
        assert_eq!(Urgency::High.to_string(), "high");
        assert_eq!(Urgency::Critical.to_string(), "critical");
    }

    #[test]
    fn test_urgency_from_str() {
        assert_eq!("critical".parse::<Urgency>().unwrap(), Urgency::Critical);
        assert_eq!("HIGH".parse::<Urgency>().unwrap(), Urgency::High);
        assert!("urgent".parse::<Urgency>().is_err());
    }

    #[test]
    fn test_urgency_numeric_mapping() {
        for (n, urgency) in [(0u8, Urgency::Normal), (1, Urgency::High), (2, Urgency::Critical)] {
            assert_eq!(Urgency::try_from(n).unwrap(), urgency);
            assert_eq!(u8::from(urgency), n);
        }
        assert!(matches!(
            Urgency::try_from(3),
            Err(DeskError::UrgencyOutOfRange(3))
        ));
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(TicketStatus::from(true).to_string(), "open");
        assert_eq!(TicketStatus::from(false).to_string(), "closed");
    }

    #[test]
    fn test_ticket_deserializes_backend_shape() {
        let json = r#"{
            "ticketId": "t-17",
            "title": "Withdrawal stuck",
            "dateCreated": "2024-03-01T10:00:00Z",
            "dateUpdated": "2024-03-02T08:30:00Z",
            "isActive": true,
            "urgency": 2,
            "lastReply": "support"
        }"#;
        let ticket: Ticket = serde_json::from_str(json).unwrap();
        assert_eq!(ticket.ticket_id, "t-17");
        assert_eq!(ticket.urgency, Urgency::Critical);
        assert_eq!(ticket.status(), TicketStatus::Open);
        assert!(ticket.awaiting_customer());
        assert_eq!(ticket.reply_label(), "awaiting you");
    }

    #[test]
    fn test_ticket_rejects_unknown_urgency() {
        let json = r#"{
            "ticketId": "t-1",
            "title": "x",
            "dateCreated": "2024-03-01",
            "dateUpdated": "2024-03-01",
            "isActive": true,
            "urgency": 7
        }"#;
        assert!(serde_json::from_str::<Ticket>(json).is_err());
    }

    #[test]
    fn test_closed_ticket_reply_label() {
        let ticket = Ticket {
            ticket_id: "t-2".to_string(),
            title: "Old".to_string(),
            date_created: "2024-01-01".to_string(),
            date_updated: "2024-01-02".to_string(),
            is_active: false,
            urgency: Urgency::Normal,
            last_reply: SUPPORT_SENDER.to_string(),
        };
        assert!(!ticket.awaiting_customer());
        assert_eq!(ticket.reply_label(), "-");
    }
}
