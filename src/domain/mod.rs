pub mod codec;
pub mod destination;
pub mod entities;
pub mod errors;
