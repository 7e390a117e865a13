// Core library for yaptools: small helpers for data-processing code

pub mod alphanum;
pub mod error;
pub mod lazy;
pub mod logger;
pub mod once;
pub mod parallel;
pub mod registry;
pub mod validity;

pub use alphanum::{
    alphanum_cmp, alphanum_key, alphanum_sort, alphanum_sort_in_place, alphanum_sort_values,
    AlphanumKey, Segment,
};
pub use error::{Error, Result};
pub use lazy::LazyProperty;
pub use logger::{
    register_queue, HandlerConfig, Level, LevelSpec, LogRecord, Logged, Logger, LoggerConfig,
};
pub use once::OnceGuard;
pub use parallel::{DataFrame, Label, PoolConfig, PoolTransform, Series, Table, Transformed};
pub use registry::{InstantiateSpec, Kwargs, Registry};
pub use validity::{check_type_validity, kind_of, Kind};
