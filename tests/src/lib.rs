//! End-to-end sweeps against loopback listeners and stand-in ssh tooling.

#[cfg(test)]
mod utils;

mod sweep;
