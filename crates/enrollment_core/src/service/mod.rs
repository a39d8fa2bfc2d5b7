//! Use-case services over the repository layer.

pub mod enrollment_service;
