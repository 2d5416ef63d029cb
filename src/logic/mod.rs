pub mod figure_service;
pub mod validate;

pub use figure_service::*;
pub use validate::*;
