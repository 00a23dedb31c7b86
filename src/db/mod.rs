pub mod memory;
pub mod mongo;
pub mod repository;
pub mod seed;
