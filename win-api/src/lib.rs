#[cfg(windows)]
pub mod firmware;
