pub mod driver;
pub mod idle;
pub mod launch;
pub mod page;
pub mod service;
