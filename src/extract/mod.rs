pub mod page;
pub mod traits;

pub use page::PageExtractor;
pub use traits::ListingExtractor;
