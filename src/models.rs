pub mod auth;
pub mod checkin;
pub mod dashboard;
pub mod diagnostico;
pub mod empresa;
pub mod referencia;
pub mod visita;
