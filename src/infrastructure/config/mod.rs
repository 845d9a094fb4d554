//! Config storage infrastructure module

mod xdg;

pub use xdg::XdgConfigStore;
