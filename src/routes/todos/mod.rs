pub mod dto;
#[cfg(test)]
pub mod memory;
pub mod model;
pub mod repository;
pub mod routes;
