//! Access token signing/verification and refresh token generation.

pub mod claims;
pub mod codec;
pub mod decoder;
pub mod encoder;
pub mod refresh;

pub use claims::AccessClaims;
pub use codec::{TokenCodec, TokenPair};
pub use decoder::JwtDecoder;
pub use encoder::JwtEncoder;
pub use refresh::RefreshTokenIssuer;
