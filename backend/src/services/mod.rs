pub mod health;
pub mod shift_data;
