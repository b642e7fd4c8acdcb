pub mod export;
pub mod health;
pub mod records;
pub mod stats;
pub mod uploads;
