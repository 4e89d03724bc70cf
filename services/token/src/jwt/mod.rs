//! Token building, time claims and encoding.

pub mod algorithm;
pub mod builder;
pub mod claims;
pub mod clock;
pub mod serializer;

pub use algorithm::SigningAlgorithm;
pub use builder::TokenBuilder;
pub use claims::{TimeValue, Timestamp};
pub use clock::{Clock, FixedClock, SystemClock};
pub use serializer::JwtSerializer;
