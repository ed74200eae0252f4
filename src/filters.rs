use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite};

/// Optional bounds on an appointment's `start_datetime`. Both bounds are
/// independent and combined with AND when both are present; `end_datetime`
/// is never filtered.
#[derive(Debug, Default, Deserialize)]
pub struct AppointmentFilter {
    pub start_datetime_gte: Option<DateTime<Utc>>,
    pub start_datetime_lt: Option<DateTime<Utc>>,
}

impl AppointmentFilter {
    /// Appends the WHERE clause for the active bounds. With no bounds the
    /// query is left untouched and matches every row.
    pub fn push_predicates(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        let mut separator = " WHERE ";
        if let Some(gte) = self.start_datetime_gte {
            qb.push(separator).push("start_datetime >= ").push_bind(gte);
            separator = " AND ";
        }
        if let Some(lt) = self.start_datetime_lt {
            qb.push(separator).push("start_datetime < ").push_bind(lt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn builder() -> QueryBuilder<'static, Sqlite> {
        QueryBuilder::new("SELECT * FROM appointments")
    }

    #[test]
    fn no_bounds_leaves_query_unfiltered() {
        let filter = AppointmentFilter::default();
        let mut qb = builder();
        filter.push_predicates(&mut qb);
        assert_eq!(qb.sql(), "SELECT * FROM appointments");
    }

    #[test]
    fn lower_bound_is_inclusive() {
        let filter = AppointmentFilter {
            start_datetime_gte: Some(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()),
            start_datetime_lt: None,
        };
        let mut qb = builder();
        filter.push_predicates(&mut qb);
        assert_eq!(
            qb.sql(),
            "SELECT * FROM appointments WHERE start_datetime >= ?"
        );
    }

    #[test]
    fn upper_bound_is_exclusive() {
        let filter = AppointmentFilter {
            start_datetime_gte: None,
            start_datetime_lt: Some(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()),
        };
        let mut qb = builder();
        filter.push_predicates(&mut qb);
        assert_eq!(
            qb.sql(),
            "SELECT * FROM appointments WHERE start_datetime < ?"
        );
    }

    #[test]
    fn both_bounds_are_combined_with_and() {
        let filter = AppointmentFilter {
            start_datetime_gte: Some(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()),
            start_datetime_lt: Some(Utc.with_ymd_and_hms(2026, 3, 1, 14, 0, 0).unwrap()),
        };
        let mut qb = builder();
        filter.push_predicates(&mut qb);
        assert_eq!(
            qb.sql(),
            "SELECT * FROM appointments WHERE start_datetime >= ? AND start_datetime < ?"
        );
    }
}
