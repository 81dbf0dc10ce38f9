pub mod decoders;
pub mod secrets;
