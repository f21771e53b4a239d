//! Event model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::errors::PlanMeError;

/// Sentinel price value for events that require no payment
pub const FREE_PRICE: &str = "Free";

/// Wire format of the stored event date, day-month-year
pub const DATE_FORMAT: &str = "%d-%m-%Y";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub event_id: i64,
    pub organizer_id: i64,
    /// Organizer display name, snapshotted at creation time
    pub organizer_name: String,
    pub title: String,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
    /// Stored as `DD-MM-YYYY`; parse through [`Event::parsed_date`] wherever
    /// chronology matters, never compare the raw string
    pub date: String,
    pub venue: String,
    /// Either [`FREE_PRICE`] or a string parseable as a non-negative number
    pub price: String,
    pub address: String,
    pub post_code: String,
    pub city: String,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Whether the event requires no payment
    pub fn is_free(&self) -> bool {
        self.price == FREE_PRICE
    }

    /// The event date as a calendar value
    pub fn parsed_date(&self) -> Result<NaiveDate, PlanMeError> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT)
            .map_err(|e| PlanMeError::Validation(format!("invalid event date {:?}: {}", self.date, e)))
    }

    /// Ticket price in the provider's minor units (pennies). Zero for free
    /// events; rejects prices that do not parse as a non-negative number.
    pub fn minor_unit_amount(&self) -> Result<i64, PlanMeError> {
        if self.is_free() {
            return Ok(0);
        }

        let price: f64 = self
            .price
            .parse()
            .map_err(|_| PlanMeError::Validation(format!("invalid event price {:?}", self.price)))?;

        if price < 0.0 || !price.is_finite() {
            return Err(PlanMeError::Validation(format!(
                "invalid event price {:?}",
                self.price
            )));
        }

        Ok((price * 100.0).round() as i64)
    }
}

/// Fields accepted when creating an event. All are required to be non-empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
    pub date: String,
    pub venue: String,
    pub price: String,
    pub address: String,
    pub post_code: String,
    pub city: String,
}

/// Optional equality predicates for event listing. A present field adds a
/// conjunctive clause; an absent field adds nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventFilter {
    pub organizer_id: Option<i64>,
    pub organizer_name: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub date: Option<String>,
    pub price: Option<String>,
    pub post_code: Option<String>,
    pub city: Option<String>,
}

impl EventFilter {
    pub fn is_empty(&self) -> bool {
        self.organizer_id.is_none()
            && self.organizer_name.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
            && self.date.is_none()
            && self.price.is_none()
            && self.post_code.is_none()
            && self.city.is_none()
    }
}

/// One page of filtered and sorted events, plus the unbounded result set
/// callers derive total counts and paging metadata from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventPage {
    pub events: Vec<Event>,
    pub all_events: Vec<Event>,
}

impl EventPage {
    pub fn total(&self) -> usize {
        self.all_events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_with_price(price: &str) -> Event {
        Event {
            event_id: 1,
            organizer_id: 1,
            organizer_name: "Ada".to_string(),
            title: "Launch".to_string(),
            description: "Launch party".to_string(),
            start_time: "18:00".to_string(),
            end_time: "22:00".to_string(),
            date: "01-03-2025".to_string(),
            venue: "Roundhouse".to_string(),
            price: price.to_string(),
            address: "1 Main St".to_string(),
            post_code: "NW1 8EH".to_string(),
            city: "London".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_free_sentinel() {
        assert!(event_with_price("Free").is_free());
        assert_eq!(event_with_price("Free").minor_unit_amount().unwrap(), 0);
        assert!(!event_with_price("12.50").is_free());
    }

    #[test]
    fn test_minor_unit_conversion() {
        assert_eq!(event_with_price("12.50").minor_unit_amount().unwrap(), 1250);
        assert_eq!(event_with_price("5").minor_unit_amount().unwrap(), 500);
        assert_eq!(event_with_price("0").minor_unit_amount().unwrap(), 0);
    }

    #[test]
    fn test_bad_price_rejected() {
        assert!(event_with_price("ten quid").minor_unit_amount().is_err());
        assert!(event_with_price("-3").minor_unit_amount().is_err());
    }

    #[test]
    fn test_parsed_date_is_day_month_year() {
        let date = event_with_price("Free").parsed_date().unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }
}
