pub mod cli;
pub mod cointegration;
pub mod commands;
pub mod data;
pub mod math;
pub mod observability;
