mod calendar;
mod reminder;
mod shared;
mod status;
mod webhook;

pub use crate::calendar::api::*;
pub use crate::reminder::api::*;
pub use crate::shared::api::*;
pub use crate::status::api::*;
pub use crate::webhook::api::*;
