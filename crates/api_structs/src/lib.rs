mod dog;
mod family;
mod reminder;
mod status;
mod user;

pub mod dtos {
    pub use crate::dog::dtos::*;
    pub use crate::family::dtos::*;
    pub use crate::reminder::dtos::*;
    pub use crate::user::dtos::*;
}

pub use crate::dog::api::*;
pub use crate::family::api::*;
pub use crate::reminder::api::*;
pub use crate::status::api::*;
pub use crate::user::api::*;
