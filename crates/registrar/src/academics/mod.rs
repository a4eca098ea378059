pub mod enrollment;
pub mod transcript;
