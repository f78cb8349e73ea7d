mod error_content;
pub use error_content::{ErrorContent, TokenFailure};

mod locale;
pub use locale::{Locale, ParseLocaleError};

mod paging;
pub use paging::{Page, PagingContext};
