//! # snowstorm-sim
//!
//! A discrete-event simulator for two related metastable voting consensus
//! protocols: [`snowball`], a single-decision binary agreement protocol, and
//! [`avalanche`], a DAG-structured multi-decision protocol built on
//! Snowball-style conflict sets.
//!
//! ## Snowball
//!
//! `snowball` runs many independent binary-agreement participants to
//! termination or an iteration cap, under a pluggable adversary.
//!
//! ## Avalanche
//!
//! `avalanche` runs an open-ended DAG consensus among participants that
//! generate and vote on transactions, pruning the undecided frontier as
//! blocks become accepted.

pub mod config;
pub mod event_log;
pub mod oracle;
pub mod rng;

pub mod avalanche;
pub mod snowball;


#[derive(Debug)]
pub enum Error {
    Snowball(snowball::Error),
    Avalanche(avalanche::Error),
    Config(::config::ConfigError),
    Io(std::io::Error),
}

impl std::error::Error for Error {}

impl std::convert::From<snowball::Error> for Error {
    fn from(error: snowball::Error) -> Self {
        Error::Snowball(error)
    }
}

impl std::convert::From<avalanche::Error> for Error {
    fn from(error: avalanche::Error) -> Self {
        Error::Avalanche(error)
    }
}

impl std::convert::From<::config::ConfigError> for Error {
    fn from(error: ::config::ConfigError) -> Self {
        Error::Config(error)
    }
}

impl std::convert::From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io(error)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
