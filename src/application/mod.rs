// Application layer - Use cases and upstream access traits
pub mod advisory_service;
pub mod air_quality_repository;
pub mod pipeline;
