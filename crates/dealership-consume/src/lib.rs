//! Dispatch & decoding (C5) plus the consumer runtime (C4).

mod dispatch;
mod runtime;

pub use dispatch::{decode, ConsumeError, Decoded};
pub use runtime::run;
