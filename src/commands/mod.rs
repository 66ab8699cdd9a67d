//! Command implementations for the gitbundler CLI

pub mod bundle;
