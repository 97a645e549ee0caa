// Application layer - Use cases and the ports they depend on
pub mod air_quality_provider;
pub mod aqi_service;
pub mod measurement_repository;
pub mod visibility_repository;
