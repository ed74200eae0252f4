use serde::{Deserialize, Serialize};

/// One membership of one Employee in one Appointment. Duplicate
/// (appointment_id, employee_id) pairs are allowed.
#[derive(sqlx::FromRow, Serialize, Deserialize, Debug)]
pub struct AppointmentEmployee {
    pub id: i64,
    pub appointment_id: i64,
    pub employee_id: i64,
}
