pub mod attendance;
pub mod contractor;
pub mod project;
pub mod role;
pub mod user;
