mod jwt_claims;
pub use jwt_claims::{JwtClaims, JwtTokenType};

mod token_pair;
pub use token_pair::{AccessToken, RefreshToken, TokenPair};
