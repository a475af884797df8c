pub mod apparent;
pub mod catalog;
pub mod chart;
pub mod config;
pub mod constants;
pub mod earth_orientation;
pub mod env_state;
pub mod jpl_ephem;
pub mod observers;
pub mod projection;
pub mod ref_system;
pub mod starmap;
pub mod starmap_errors;
pub mod time;
