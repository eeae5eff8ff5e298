pub mod messaging;
pub mod twiml;
pub mod usecase;
