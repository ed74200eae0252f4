//! Maintains the many-to-many relationship between appointments and
//! employees through explicit `appointment_employees` rows.

use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::models::employee::Employee;

/// Replaces the full employee set of an appointment.
///
/// Referenced ids are checked before any row is touched, so the operation
/// either fully succeeds or leaves the existing membership intact. The
/// delete-then-insert sequence runs in one transaction; a concurrent reader
/// never observes the emptied intermediate state. Duplicate ids in the input
/// produce duplicate rows.
pub async fn replace_employees(
    pool: &SqlitePool,
    appointment_id: i64,
    employee_ids: &[i64],
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let appointment_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM appointments WHERE id = ?)")
            .bind(appointment_id)
            .fetch_one(&mut *tx)
            .await?;
    if !appointment_exists {
        return Err(AppError::NotFound(format!(
            "Appointment with ID {} does not exist.",
            appointment_id
        )));
    }

    for &employee_id in employee_ids {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM employees WHERE id = ?)")
            .bind(employee_id)
            .fetch_one(&mut *tx)
            .await?;
        if !exists {
            return Err(AppError::Validation(format!(
                "Unknown employee id {}.",
                employee_id
            )));
        }
    }

    sqlx::query("DELETE FROM appointment_employees WHERE appointment_id = ?")
        .bind(appointment_id)
        .execute(&mut *tx)
        .await?;

    for &employee_id in employee_ids {
        sqlx::query("INSERT INTO appointment_employees (appointment_id, employee_id) VALUES (?, ?)")
            .bind(appointment_id)
            .bind(employee_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Deletes every association row referencing the employee, across all
/// appointments, and returns the number of rows removed. Zero matching rows
/// is reported as not-found rather than a zero-count success.
pub async fn delete_by_employee(pool: &SqlitePool, employee_id: i64) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM appointment_employees WHERE employee_id = ?")
        .bind(employee_id)
        .execute(pool)
        .await?;

    let deleted = result.rows_affected();
    if deleted == 0 {
        return Err(AppError::NotFound(format!(
            "No appointment-employee records found for employee ID {}.",
            employee_id
        )));
    }
    Ok(deleted)
}

/// Lists the current members of an appointment, in association order.
pub async fn employees_for_appointment(
    pool: &SqlitePool,
    appointment_id: i64,
) -> Result<Vec<Employee>, AppError> {
    let appointment_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM appointments WHERE id = ?)")
            .bind(appointment_id)
            .fetch_one(pool)
            .await?;
    if !appointment_exists {
        return Err(AppError::NotFound(format!(
            "Appointment with ID {} does not exist.",
            appointment_id
        )));
    }

    let employees = sqlx::query_as::<_, Employee>(
        "SELECT e.id, e.name, e.email, e.position, e.department_id \
         FROM employees e \
         JOIN appointment_employees ae ON ae.employee_id = e.id \
         WHERE ae.appointment_id = ? \
         ORDER BY ae.id",
    )
    .bind(appointment_id)
    .fetch_all(pool)
    .await?;

    Ok(employees)
}
