pub mod employee;
pub mod leave_request;
pub mod role;
pub mod user_info;
