pub mod cycle;
pub mod watch;
