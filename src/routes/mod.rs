//! HTTP routes for the carros service

pub mod carros;
pub mod health;
mod response;

pub use carros::{create_carro, delete_carro, get_carro, list_carros, update_carro};
pub use health::health_check;
pub use response::{error_response, json_response, FullBody};
