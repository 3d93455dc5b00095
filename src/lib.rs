// Adwatch: new-listing email alerts for a classifieds page.
//
// This is the library root. Each module corresponds to one stage of the
// scan cycle: extract, filter for novelty, notify, persist.

pub mod config;
pub mod db;
pub mod extract;
pub mod notify;
pub mod novelty;
pub mod output;
pub mod pipeline;
pub mod status;
