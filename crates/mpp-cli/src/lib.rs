//! Library components of the `mpp` command-line tool.

pub mod inspect;
pub mod logging;
