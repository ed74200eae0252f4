use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use validator::Validate;

use crate::errors::AppError;
use crate::models::department::Department;
use crate::models::employee::Employee;
use crate::utils::validation::validate_payload;

#[derive(Deserialize, Validate)]
pub struct NewDepartment {
    #[validate(length(min = 1, max = 255))]
    name: String,
    description: String,
    manager_id: Option<i64>,
}

#[derive(Deserialize)]
pub struct DepartmentQueryParams {
    name: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct DepartmentPatch {
    #[validate(length(min = 1, max = 255))]
    name: Option<String>,
    description: Option<String>,
    manager_id: Option<i64>,
}

async fn ensure_manager_exists(pool: &SqlitePool, manager_id: i64) -> Result<(), AppError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM employees WHERE id = ?)")
        .bind(manager_id)
        .fetch_one(pool)
        .await?;
    if !exists {
        return Err(AppError::Validation(format!(
            "Unknown manager employee id {}.",
            manager_id
        )));
    }
    Ok(())
}

async fn fetch_department(pool: &SqlitePool, id: i64) -> Result<Department, AppError> {
    sqlx::query_as::<_, Department>("SELECT * FROM departments WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Department with ID {} does not exist.", id)))
}

pub async fn create_department(
    pool: web::Data<SqlitePool>,
    new_department: web::Json<NewDepartment>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*new_department)?;

    if let Some(manager_id) = new_department.manager_id {
        ensure_manager_exists(pool.get_ref(), manager_id).await?;
    }

    let result = sqlx::query("INSERT INTO departments (name, description, manager_id) VALUES (?, ?, ?)")
        .bind(&new_department.name)
        .bind(&new_department.description)
        .bind(new_department.manager_id)
        .execute(pool.get_ref())
        .await?;

    let department = fetch_department(pool.get_ref(), result.last_insert_rowid()).await?;
    Ok(HttpResponse::Created().json(department))
}

pub async fn get_departments(
    pool: web::Data<SqlitePool>,
    query: web::Query<DepartmentQueryParams>,
) -> Result<HttpResponse, AppError> {
    let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new("SELECT * FROM departments");

    if let Some(name) = &query.name {
        qb.push(" WHERE name LIKE ").push_bind(format!("%{}%", name));
    }
    qb.push(" ORDER BY id");

    let departments = qb
        .build_query_as::<Department>()
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(departments))
}

pub async fn get_department(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let department = fetch_department(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(department))
}

pub async fn update_department(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    updates: web::Json<NewDepartment>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*updates)?;

    let id = path.into_inner();
    fetch_department(pool.get_ref(), id).await?;

    if let Some(manager_id) = updates.manager_id {
        ensure_manager_exists(pool.get_ref(), manager_id).await?;
    }

    sqlx::query("UPDATE departments SET name = ?, description = ?, manager_id = ? WHERE id = ?")
        .bind(&updates.name)
        .bind(&updates.description)
        .bind(updates.manager_id)
        .bind(id)
        .execute(pool.get_ref())
        .await?;

    let department = fetch_department(pool.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(department))
}

pub async fn patch_department(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    updates: web::Json<DepartmentPatch>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*updates)?;

    let id = path.into_inner();
    let current = fetch_department(pool.get_ref(), id).await?;

    if let Some(manager_id) = updates.manager_id {
        ensure_manager_exists(pool.get_ref(), manager_id).await?;
    }

    let name = updates.name.clone().unwrap_or(current.name);
    let description = updates.description.clone().unwrap_or(current.description);
    let manager_id = updates.manager_id.or(current.manager_id);

    sqlx::query("UPDATE departments SET name = ?, description = ?, manager_id = ? WHERE id = ?")
        .bind(&name)
        .bind(&description)
        .bind(manager_id)
        .bind(id)
        .execute(pool.get_ref())
        .await?;

    let department = fetch_department(pool.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(department))
}

pub async fn delete_department(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    fetch_department(pool.get_ref(), id).await?;

    sqlx::query("DELETE FROM departments WHERE id = ?")
        .bind(id)
        .execute(pool.get_ref())
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

pub async fn get_department_employees(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    fetch_department(pool.get_ref(), id).await?;

    let employees =
        sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE department_id = ? ORDER BY id")
            .bind(id)
            .fetch_all(pool.get_ref())
            .await?;

    Ok(HttpResponse::Ok().json(employees))
}
