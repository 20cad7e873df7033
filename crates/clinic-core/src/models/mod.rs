//! Domain models for the clinic.

mod agenda;
mod document;
mod patient;
mod person;
mod school;

pub use agenda::*;
pub use document::*;
pub use patient::*;
pub use person::*;
pub use school::*;
