pub mod clock;
pub mod crypto_utils;
pub mod decimal_utils;
pub mod utils;
