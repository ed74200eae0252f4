use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use validator::Validate;

use crate::errors::AppError;
use crate::models::employee::Employee;
use crate::utils::validation::validate_payload;

#[derive(Deserialize, Validate)]
pub struct NewEmployee {
    #[validate(length(min = 1, max = 255))]
    name: String,
    #[validate(email, length(max = 254))]
    email: String,
    #[validate(custom = "validate_position")]
    position: String,
    department_id: i64,
}

#[derive(Deserialize)]
pub struct EmployeeQueryParams {
    name: Option<String>,
    email: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct EmployeePatch {
    #[validate(length(min = 1, max = 255))]
    name: Option<String>,
    #[validate(email, length(max = 254))]
    email: Option<String>,
    #[validate(custom = "validate_position")]
    position: Option<String>,
    department_id: Option<i64>,
}

fn validate_position(position: &str) -> Result<(), validator::ValidationError> {
    if position != "employee" && position != "manager" {
        return Err(validator::ValidationError::new(
            "position must be either 'employee' or 'manager'",
        ));
    }
    Ok(())
}

async fn ensure_department_exists(pool: &SqlitePool, department_id: i64) -> Result<(), AppError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM departments WHERE id = ?)")
        .bind(department_id)
        .fetch_one(pool)
        .await?;
    if !exists {
        return Err(AppError::Validation(format!(
            "Unknown department id {}.",
            department_id
        )));
    }
    Ok(())
}

/// Email is globally unique; `exclude_id` skips the row being updated.
async fn ensure_email_available(
    pool: &SqlitePool,
    email: &str,
    exclude_id: Option<i64>,
) -> Result<(), AppError> {
    let taken: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM employees WHERE email = ? AND id != ?)")
            .bind(email)
            .bind(exclude_id.unwrap_or(-1))
            .fetch_one(pool)
            .await?;
    if taken {
        return Err(AppError::Conflict(format!(
            "Employee with email '{}' already exists.",
            email
        )));
    }
    Ok(())
}

async fn fetch_employee(pool: &SqlitePool, id: i64) -> Result<Employee, AppError> {
    sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee with ID {} does not exist.", id)))
}

pub async fn create_employee(
    pool: web::Data<SqlitePool>,
    new_employee: web::Json<NewEmployee>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*new_employee)?;

    ensure_department_exists(pool.get_ref(), new_employee.department_id).await?;
    ensure_email_available(pool.get_ref(), &new_employee.email, None).await?;

    let result =
        sqlx::query("INSERT INTO employees (name, email, position, department_id) VALUES (?, ?, ?, ?)")
            .bind(&new_employee.name)
            .bind(&new_employee.email)
            .bind(&new_employee.position)
            .bind(new_employee.department_id)
            .execute(pool.get_ref())
            .await?;

    let employee = fetch_employee(pool.get_ref(), result.last_insert_rowid()).await?;
    Ok(HttpResponse::Created().json(employee))
}

pub async fn get_employees(
    pool: web::Data<SqlitePool>,
    query: web::Query<EmployeeQueryParams>,
) -> Result<HttpResponse, AppError> {
    let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new("SELECT * FROM employees");

    let mut separator = " WHERE ";
    if let Some(name) = &query.name {
        qb.push(separator)
            .push("name LIKE ")
            .push_bind(format!("%{}%", name));
        separator = " AND ";
    }
    if let Some(email) = &query.email {
        qb.push(separator).push("email = ").push_bind(email.clone());
    }
    qb.push(" ORDER BY id");

    let employees = qb
        .build_query_as::<Employee>()
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(employees))
}

pub async fn get_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let employee = fetch_employee(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(employee))
}

pub async fn update_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    updates: web::Json<NewEmployee>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*updates)?;

    let id = path.into_inner();
    fetch_employee(pool.get_ref(), id).await?;

    ensure_department_exists(pool.get_ref(), updates.department_id).await?;
    ensure_email_available(pool.get_ref(), &updates.email, Some(id)).await?;

    sqlx::query("UPDATE employees SET name = ?, email = ?, position = ?, department_id = ? WHERE id = ?")
        .bind(&updates.name)
        .bind(&updates.email)
        .bind(&updates.position)
        .bind(updates.department_id)
        .bind(id)
        .execute(pool.get_ref())
        .await?;

    let employee = fetch_employee(pool.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(employee))
}

pub async fn patch_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    updates: web::Json<EmployeePatch>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*updates)?;

    let id = path.into_inner();
    let current = fetch_employee(pool.get_ref(), id).await?;

    if let Some(department_id) = updates.department_id {
        ensure_department_exists(pool.get_ref(), department_id).await?;
    }
    if let Some(email) = &updates.email {
        ensure_email_available(pool.get_ref(), email, Some(id)).await?;
    }

    let name = updates.name.clone().unwrap_or(current.name);
    let email = updates.email.clone().unwrap_or(current.email);
    let position = updates.position.clone().unwrap_or(current.position);
    let department_id = updates.department_id.unwrap_or(current.department_id);

    sqlx::query("UPDATE employees SET name = ?, email = ?, position = ?, department_id = ? WHERE id = ?")
        .bind(&name)
        .bind(&email)
        .bind(&position)
        .bind(department_id)
        .bind(id)
        .execute(pool.get_ref())
        .await?;

    let employee = fetch_employee(pool.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(employee))
}

pub async fn delete_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    fetch_employee(pool.get_ref(), id).await?;

    sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(id)
        .execute(pool.get_ref())
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
