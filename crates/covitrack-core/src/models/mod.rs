//! Domain models for the covitrack system.

mod consultation;
mod lab;
mod request;
mod user;

pub use consultation::*;
pub use lab::*;
pub use request::*;
pub use user::*;
