pub mod codec;
pub mod errors;
pub mod payload;

pub use codec::TokenCodec;
pub use errors::TokenError;
pub use payload::TokenPayload;
