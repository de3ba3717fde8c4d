pub mod cookie;
pub mod password;
