pub mod time;
pub mod validate;
