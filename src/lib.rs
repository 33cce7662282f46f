pub mod args;
pub mod calendar;
pub mod commands;
mod error;
pub mod ingest;
pub mod model;
pub mod outlier;
pub mod periods;
pub mod report;
#[cfg(test)]
pub(crate) mod test;

pub use error::Error;
pub use error::Result;
pub use model::Amount;
