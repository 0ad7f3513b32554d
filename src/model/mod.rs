//! Model definitions for metered consumption and the store they are written to.
//!
//! This module provides the record shapes produced by the portal parser, the
//! hour label resolver, and the traits used to turn records into InfluxDB
//! data points.

pub mod consumption;
pub mod meter;
pub mod time_slot;
pub mod traits;
pub mod types;

pub use consumption::{ConsumptionRecord, BUCKETS, MEASUREMENT, METER_TAG};
pub use meter::Meter;
pub use traits::{ConsumptionStore, DataPointBuilder};
pub use types::TimeWindow;
