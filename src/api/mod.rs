pub mod attendance;
pub mod contractor;
pub mod export;
pub mod project;
