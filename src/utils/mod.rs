// Utility modules shared by the services

pub mod date;
