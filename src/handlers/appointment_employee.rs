use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;

use crate::associations;
use crate::errors::AppError;
use crate::models::appointment_employee::AppointmentEmployee;

#[derive(Deserialize)]
pub struct NewAppointmentEmployee {
    appointment_id: i64,
    employee_id: i64,
}

async fn ensure_endpoints_exist(
    pool: &SqlitePool,
    appointment_id: i64,
    employee_id: i64,
) -> Result<(), AppError> {
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

    let employee_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM employees WHERE id = ?)")
            .bind(employee_id)
            .fetch_one(pool)
            .await?;
    if !employee_exists {
        return Err(AppError::NotFound(format!(
            "Employee with ID {} does not exist.",
            employee_id
        )));
    }
    Ok(())
}

async fn fetch_association(pool: &SqlitePool, id: i64) -> Result<AppointmentEmployee, AppError> {
    sqlx::query_as::<_, AppointmentEmployee>("SELECT * FROM appointment_employees WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "AppointmentEmployee with ID {} does not exist.",
                id
            ))
        })
}

pub async fn create_association(
    pool: web::Data<SqlitePool>,
    new_association: web::Json<NewAppointmentEmployee>,
) -> Result<HttpResponse, AppError> {
    ensure_endpoints_exist(
        pool.get_ref(),
        new_association.appointment_id,
        new_association.employee_id,
    )
    .await?;

    let result =
        sqlx::query("INSERT INTO appointment_employees (appointment_id, employee_id) VALUES (?, ?)")
            .bind(new_association.appointment_id)
            .bind(new_association.employee_id)
            .execute(pool.get_ref())
            .await?;

    let association = fetch_association(pool.get_ref(), result.last_insert_rowid()).await?;
    Ok(HttpResponse::Created().json(association))
}

pub async fn get_associations(pool: web::Data<SqlitePool>) -> Result<HttpResponse, AppError> {
    let associations = sqlx::query_as::<_, AppointmentEmployee>(
        "SELECT * FROM appointment_employees ORDER BY id",
    )
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(associations))
}

pub async fn get_association(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let association = fetch_association(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(association))
}

pub async fn update_association(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    updates: web::Json<NewAppointmentEmployee>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    fetch_association(pool.get_ref(), id).await?;

    ensure_endpoints_exist(pool.get_ref(), updates.appointment_id, updates.employee_id).await?;

    sqlx::query("UPDATE appointment_employees SET appointment_id = ?, employee_id = ? WHERE id = ?")
        .bind(updates.appointment_id)
        .bind(updates.employee_id)
        .bind(id)
        .execute(pool.get_ref())
        .await?;

    let association = fetch_association(pool.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(association))
}

#[derive(Deserialize)]
pub struct AppointmentEmployeePatch {
    appointment_id: Option<i64>,
    employee_id: Option<i64>,
}

pub async fn patch_association(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    updates: web::Json<AppointmentEmployeePatch>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let current = fetch_association(pool.get_ref(), id).await?;

    let appointment_id = updates.appointment_id.unwrap_or(current.appointment_id);
    let employee_id = updates.employee_id.unwrap_or(current.employee_id);
    ensure_endpoints_exist(pool.get_ref(), appointment_id, employee_id).await?;

    sqlx::query("UPDATE appointment_employees SET appointment_id = ?, employee_id = ? WHERE id = ?")
        .bind(appointment_id)
        .bind(employee_id)
        .bind(id)
        .execute(pool.get_ref())
        .await?;

    let association = fetch_association(pool.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(association))
}

pub async fn delete_association(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    fetch_association(pool.get_ref(), id).await?;

    sqlx::query("DELETE FROM appointment_employees WHERE id = ?")
        .bind(id)
        .execute(pool.get_ref())
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Removes every association for one employee across all appointments.
/// Zero matching rows is a 404, not an empty success.
pub async fn delete_associations_by_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let deleted = associations::delete_by_employee(pool.get_ref(), path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "detail": format!("{} records deleted.", deleted),
    })))
}
