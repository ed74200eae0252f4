pub mod appointment;
pub mod appointment_employee;
pub mod department;
pub mod employee;
