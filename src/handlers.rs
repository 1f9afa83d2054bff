pub mod anexos;
pub mod auth;
pub mod checkin;
pub mod dashboard;
pub mod diagnosticos;
pub mod empresas;
pub mod referencias;
pub mod relatorios;
pub mod usuarios;
pub mod visitas;
