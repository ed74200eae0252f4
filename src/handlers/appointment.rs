use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use validator::Validate;

use crate::associations;
use crate::errors::AppError;
use crate::filters::AppointmentFilter;
use crate::models::appointment::Appointment;
use crate::utils::validation::validate_payload;

#[derive(Deserialize, Validate)]
pub struct NewAppointment {
    start_datetime: DateTime<Utc>,
    end_datetime: DateTime<Utc>,
    #[validate(length(min = 1, max = 255))]
    title: String,
    description: String,
}

#[derive(Deserialize, Validate)]
pub struct AppointmentPatch {
    start_datetime: Option<DateTime<Utc>>,
    end_datetime: Option<DateTime<Utc>>,
    #[validate(length(min = 1, max = 255))]
    title: Option<String>,
    description: Option<String>,
}

#[derive(Deserialize)]
pub struct ReplaceEmployeesRequest {
    employee_ids: Vec<i64>,
}

async fn fetch_appointment(pool: &SqlitePool, id: i64) -> Result<Appointment, AppError> {
    sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Appointment with ID {} does not exist.", id)))
}

pub async fn create_appointment(
    pool: web::Data<SqlitePool>,
    new_appointment: web::Json<NewAppointment>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*new_appointment)?;

    let result = sqlx::query(
        "INSERT INTO appointments (start_datetime, end_datetime, title, description) VALUES (?, ?, ?, ?)",
    )
    .bind(new_appointment.start_datetime)
    .bind(new_appointment.end_datetime)
    .bind(&new_appointment.title)
    .bind(&new_appointment.description)
    .execute(pool.get_ref())
    .await?;

    let appointment = fetch_appointment(pool.get_ref(), result.last_insert_rowid()).await?;
    Ok(HttpResponse::Created().json(appointment))
}

pub async fn get_appointments(
    pool: web::Data<SqlitePool>,
    filter: web::Query<AppointmentFilter>,
) -> Result<HttpResponse, AppError> {
    let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new("SELECT * FROM appointments");
    filter.push_predicates(&mut qb);
    qb.push(" ORDER BY id");

    let appointments = qb
        .build_query_as::<Appointment>()
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(appointments))
}

pub async fn get_appointment(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let appointment = fetch_appointment(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(appointment))
}

pub async fn update_appointment(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    updates: web::Json<NewAppointment>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*updates)?;

    let id = path.into_inner();
    fetch_appointment(pool.get_ref(), id).await?;

    sqlx::query(
        "UPDATE appointments SET start_datetime = ?, end_datetime = ?, title = ?, description = ? WHERE id = ?",
    )
    .bind(updates.start_datetime)
    .bind(updates.end_datetime)
    .bind(&updates.title)
    .bind(&updates.description)
    .bind(id)
    .execute(pool.get_ref())
    .await?;

    let appointment = fetch_appointment(pool.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(appointment))
}

pub async fn patch_appointment(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    updates: web::Json<AppointmentPatch>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*updates)?;

    let id = path.into_inner();
    let current = fetch_appointment(pool.get_ref(), id).await?;

    let start_datetime = updates.start_datetime.unwrap_or(current.start_datetime);
    let end_datetime = updates.end_datetime.unwrap_or(current.end_datetime);
    let title = updates.title.clone().unwrap_or(current.title);
    let description = updates.description.clone().unwrap_or(current.description);

    sqlx::query(
        "UPDATE appointments SET start_datetime = ?, end_datetime = ?, title = ?, description = ? WHERE id = ?",
    )
    .bind(start_datetime)
    .bind(end_datetime)
    .bind(&title)
    .bind(&description)
    .bind(id)
    .execute(pool.get_ref())
    .await?;

    let appointment = fetch_appointment(pool.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(appointment))
}

pub async fn delete_appointment(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    fetch_appointment(pool.get_ref(), id).await?;

    sqlx::query("DELETE FROM appointments WHERE id = ?")
        .bind(id)
        .execute(pool.get_ref())
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

pub async fn get_appointment_employees(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let employees =
        associations::employees_for_appointment(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(employees))
}

/// Bulk set-replacement of an appointment's employees. Responds with the
/// resulting membership.
pub async fn replace_appointment_employees(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    request: web::Json<ReplaceEmployeesRequest>,
) -> Result<HttpResponse, AppError> {
    let appointment_id = path.into_inner();
    associations::replace_employees(pool.get_ref(), appointment_id, &request.employee_ids).await?;

    let employees = associations::employees_for_appointment(pool.get_ref(), appointment_id).await?;
    Ok(HttpResponse::Ok().json(employees))
}
