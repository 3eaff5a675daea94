pub mod aqi;
pub mod leave_request;
pub mod user_info;
pub mod value_help;
