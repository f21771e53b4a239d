//! Event listing query compiler
//!
//! Translates an optional-field filter set, an ordered list of sort keys, a
//! direction token and a 1-based page number into a deterministic pair of
//! SQL statements: one for the requested page and one unbounded statement
//! callers derive total counts from.
//!
//! The event date is stored as a `DD-MM-YYYY` string, so chronological
//! ordering must decompose it into year, month and day. Sorting the raw
//! string lexicographically would order "01-02-2025" before "05-01-2025".

use tracing::warn;

use crate::models::EventFilter;

/// Fixed page size for event listings
pub const PAGE_SIZE: i64 = 10;

const DATE_ORDER_EXPRS: [&str; 3] = [
    "EXTRACT(YEAR FROM TO_DATE(date, 'DD-MM-YYYY'))",
    "EXTRACT(MONTH FROM TO_DATE(date, 'DD-MM-YYYY'))",
    "EXTRACT(DAY FROM TO_DATE(date, 'DD-MM-YYYY'))",
];

/// Recognized sort keys for event listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    City,
    Price,
    OrganizerName,
    Date,
}

impl SortKey {
    /// Parse a comma-separated `orderBy` token list. Unknown tokens are
    /// dropped with a warning and never fail the request.
    pub fn parse_list(order_by: &str) -> Vec<SortKey> {
        order_by
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .filter_map(|token| match token {
                "city" => Some(SortKey::City),
                "price" => Some(SortKey::Price),
                "organizer_name" => Some(SortKey::OrganizerName),
                "date" => Some(SortKey::Date),
                other => {
                    warn!(token = other, "Unsupported orderBy field, dropping");
                    None
                }
            })
            .collect()
    }

    fn order_exprs(&self) -> &'static [&'static str] {
        match self {
            SortKey::City => &["city"],
            SortKey::Price => &["price"],
            SortKey::OrganizerName => &["organizer_name"],
            SortKey::Date => &DATE_ORDER_EXPRS,
        }
    }
}

/// Requested ordering direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Parse a direction token, defaulting to ascending on anything
    /// unrecognized.
    pub fn parse(token: &str) -> SortDirection {
        match token.trim().to_ascii_uppercase().as_str() {
            "DESC" | "DESCENDING" => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }

    fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// A value bound into the compiled statement, in positional order
#[derive(Debug, Clone, PartialEq)]
pub enum Bind {
    Int(i64),
    Text(String),
}

/// Complete listing request
#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    pub filter: EventFilter,
    pub order_by: Vec<SortKey>,
    pub direction: SortDirection,
    /// 1-based page number; values below 1 are clamped to the first page
    pub page: i64,
}

/// Compiled statements plus their bind values. `binds` covers the filter
/// predicates shared by both statements; the page statement additionally
/// binds `offset` as its final parameter.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    pub page_sql: String,
    pub full_sql: String,
    pub binds: Vec<Bind>,
    pub offset: i64,
}

impl EventQuery {
    /// Compile into a deterministic query plan. Never fails: unknown sort
    /// keys were already dropped at parse time and an empty key list falls
    /// back to chronological date ordering.
    pub fn compile(&self) -> QueryPlan {
        let (where_clause, binds) = self.compile_where();
        let order_clause = self.compile_order_by();

        let full_sql = format!("SELECT * FROM events{}{}", where_clause, order_clause);
        let page_sql = format!(
            "{} LIMIT {} OFFSET ${}",
            full_sql,
            PAGE_SIZE,
            binds.len() + 1
        );

        // Pages below 1 would produce a negative offset; clamp to page 1.
        let offset = (self.page.max(1) - 1) * PAGE_SIZE;

        QueryPlan {
            page_sql,
            full_sql,
            binds,
            offset,
        }
    }

    fn compile_where(&self) -> (String, Vec<Bind>) {
        let mut clauses: Vec<String> = Vec::new();
        let mut binds: Vec<Bind> = Vec::new();

        let mut push = |column: &str, bind: Bind, binds: &mut Vec<Bind>, clauses: &mut Vec<String>| {
            binds.push(bind);
            clauses.push(format!("{} = ${}", column, binds.len()));
        };

        let f = &self.filter;
        if let Some(organizer_id) = f.organizer_id {
            push("organizer_id", Bind::Int(organizer_id), &mut binds, &mut clauses);
        }
        if let Some(ref organizer_name) = f.organizer_name {
            push("organizer_name", Bind::Text(organizer_name.clone()), &mut binds, &mut clauses);
        }
        if let Some(ref start_time) = f.start_time {
            push("start_time", Bind::Text(start_time.clone()), &mut binds, &mut clauses);
        }
        if let Some(ref end_time) = f.end_time {
            push("end_time", Bind::Text(end_time.clone()), &mut binds, &mut clauses);
        }
        if let Some(ref date) = f.date {
            push("date", Bind::Text(date.clone()), &mut binds, &mut clauses);
        }
        if let Some(ref price) = f.price {
            push("price", Bind::Text(price.clone()), &mut binds, &mut clauses);
        }
        if let Some(ref post_code) = f.post_code {
            push("post_code", Bind::Text(post_code.clone()), &mut binds, &mut clauses);
        }
        if let Some(ref city) = f.city {
            push("city", Bind::Text(city.clone()), &mut binds, &mut clauses);
        }

        if clauses.is_empty() {
            (String::new(), binds)
        } else {
            (format!(" WHERE {}", clauses.join(" AND ")), binds)
        }
    }

    fn compile_order_by(&self) -> String {
        let keys: &[SortKey] = if self.order_by.is_empty() {
            &[SortKey::Date]
        } else {
            &self.order_by
        };

        // The direction token applies to every ordering expression, not just
        // the last one.
        let direction = self.direction.as_sql();
        let exprs: Vec<String> = keys
            .iter()
            .flat_map(|key| key.order_exprs())
            .map(|expr| format!("{} {}", expr, direction))
            .collect();

        format!(" ORDER BY {}", exprs.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_drops_unknown_tokens() {
        let keys = SortKey::parse_list("city, venue, price");
        assert_eq!(keys, vec![SortKey::City, SortKey::Price]);
    }

    #[test]
    fn test_parse_list_empty_string() {
        assert!(SortKey::parse_list("").is_empty());
        assert!(SortKey::parse_list("rating,venue").is_empty());
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!(SortDirection::parse("DESC"), SortDirection::Descending);
        assert_eq!(SortDirection::parse("desc"), SortDirection::Descending);
        assert_eq!(SortDirection::parse("ASC"), SortDirection::Ascending);
        assert_eq!(SortDirection::parse("sideways"), SortDirection::Ascending);
    }

    #[test]
    fn test_no_filter_has_no_where_clause() {
        let plan = EventQuery::default().compile();
        assert!(!plan.full_sql.contains("WHERE"));
        assert!(plan.binds.is_empty());
    }

    #[test]
    fn test_present_filters_become_conjunctive_predicates() {
        let query = EventQuery {
            filter: EventFilter {
                city: Some("London".to_string()),
                price: Some("Free".to_string()),
                organizer_id: Some(7),
                ..Default::default()
            },
            ..Default::default()
        };
        let plan = query.compile();

        assert!(plan.full_sql.contains("WHERE organizer_id = $1 AND price = $2 AND city = $3"));
        assert_eq!(
            plan.binds,
            vec![
                Bind::Int(7),
                Bind::Text("Free".to_string()),
                Bind::Text("London".to_string()),
            ]
        );
    }

    #[test]
    fn test_date_sort_decomposes_year_month_day() {
        let query = EventQuery {
            order_by: vec![SortKey::Date],
            ..Default::default()
        };
        let plan = query.compile();

        let year = plan.full_sql.find("EXTRACT(YEAR FROM TO_DATE(date, 'DD-MM-YYYY')) ASC");
        let month = plan.full_sql.find("EXTRACT(MONTH FROM TO_DATE(date, 'DD-MM-YYYY')) ASC");
        let day = plan.full_sql.find("EXTRACT(DAY FROM TO_DATE(date, 'DD-MM-YYYY')) ASC");
        assert!(year.unwrap() < month.unwrap());
        assert!(month.unwrap() < day.unwrap());
        // Naive lexicographic ordering on the stored string is never emitted
        assert!(!plan.full_sql.contains("ORDER BY date"));
    }

    #[test]
    fn test_empty_order_by_defaults_to_date() {
        let plan = EventQuery::default().compile();
        assert!(plan.full_sql.contains("EXTRACT(YEAR FROM TO_DATE(date, 'DD-MM-YYYY'))"));
    }

    #[test]
    fn test_direction_applies_to_every_key() {
        let query = EventQuery {
            order_by: vec![SortKey::City, SortKey::Price],
            direction: SortDirection::Descending,
            ..Default::default()
        };
        let plan = query.compile();
        assert!(plan.full_sql.contains("ORDER BY city DESC, price DESC"));
    }

    #[test]
    fn test_pagination_offsets() {
        let page = |n| EventQuery { page: n, ..Default::default() }.compile();

        assert_eq!(page(1).offset, 0);
        assert_eq!(page(2).offset, 10);
        assert_eq!(page(5).offset, 40);
        // Pages below 1 clamp instead of going negative
        assert_eq!(page(0).offset, 0);
        assert_eq!(page(-3).offset, 0);
    }

    #[test]
    fn test_page_sql_binds_offset_after_filters() {
        let query = EventQuery {
            filter: EventFilter {
                city: Some("London".to_string()),
                ..Default::default()
            },
            page: 2,
            ..Default::default()
        };
        let plan = query.compile();

        assert!(plan.page_sql.ends_with("LIMIT 10 OFFSET $2"));
        assert!(!plan.full_sql.contains("LIMIT"));
        assert!(!plan.full_sql.contains("OFFSET"));
    }
}
