// Fault vocabulary and decoding for SOAP faults raised by the PBM service.

pub mod catalog;
pub mod decoder;

pub use catalog::FaultKind;
pub use decoder::{decode_fault, decode_inline_fault, FaultDetail, LocalizableMessage, RemoteFault};
