//! Connection dispatch: the TCP accept loop.

pub mod listener;
