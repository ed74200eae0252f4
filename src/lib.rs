pub mod associations;
pub mod db;
pub mod errors;
pub mod filters;
pub mod handlers;
pub mod models;
pub mod utils;

use actix_web::web;

use crate::errors::AppError;

/// Mounts every route and the extractor configs. The caller supplies the
/// `web::Data<SqlitePool>` and middleware.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _| AppError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _| AppError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _| AppError::Validation(err.to_string()).into()),
    )
    .service(
        web::resource("/departments")
            .route(web::get().to(handlers::department::get_departments))
            .route(web::post().to(handlers::department::create_department)),
    )
    .service(
        web::resource("/departments/{id}")
            .route(web::get().to(handlers::department::get_department))
            .route(web::put().to(handlers::department::update_department))
            .route(web::patch().to(handlers::department::patch_department))
            .route(web::delete().to(handlers::department::delete_department)),
    )
    .service(
        web::resource("/departments/{id}/employees")
            .route(web::get().to(handlers::department::get_department_employees)),
    )
    .service(
        web::resource("/employees")
            .route(web::get().to(handlers::employee::get_employees))
            .route(web::post().to(handlers::employee::create_employee)),
    )
    .service(
        web::resource("/employees/{id}")
            .route(web::get().to(handlers::employee::get_employee))
            .route(web::put().to(handlers::employee::update_employee))
            .route(web::patch().to(handlers::employee::patch_employee))
            .route(web::delete().to(handlers::employee::delete_employee)),
    )
    .service(
        web::resource("/appointments")
            .route(web::get().to(handlers::appointment::get_appointments))
            .route(web::post().to(handlers::appointment::create_appointment)),
    )
    .service(
        web::resource("/appointments/{id}")
            .route(web::get().to(handlers::appointment::get_appointment))
            .route(web::put().to(handlers::appointment::update_appointment))
            .route(web::patch().to(handlers::appointment::patch_appointment))
            .route(web::delete().to(handlers::appointment::delete_appointment)),
    )
    .service(
        web::resource("/appointments/{id}/employees")
            .route(web::get().to(handlers::appointment::get_appointment_employees))
            .route(web::put().to(handlers::appointment::replace_appointment_employees)),
    )
    .service(
        web::resource("/appointment-employees")
            .route(web::get().to(handlers::appointment_employee::get_associations))
            .route(web::post().to(handlers::appointment_employee::create_association)),
    )
    .service(
        web::resource("/appointment-employees/by-employee/{employee_id}").route(
            web::delete().to(handlers::appointment_employee::delete_associations_by_employee),
        ),
    )
    .service(
        web::resource("/appointment-employees/{id}")
            .route(web::get().to(handlers::appointment_employee::get_association))
            .route(web::put().to(handlers::appointment_employee::update_association))
            .route(web::patch().to(handlers::appointment_employee::patch_association))
            .route(web::delete().to(handlers::appointment_employee::delete_association)),
    );
}
