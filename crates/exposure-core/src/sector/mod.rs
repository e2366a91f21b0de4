//! Sector codes and industry aggregation
//!
//! The input-output model reports demand by industry while the emissions
//! inventory is organised by Source Classification Code. This module holds
//! the mapping between the two and the aggregation that applies it.

pub mod aggregate;
pub mod map;

pub use aggregate::{SectorAggregator, aggregate, emissions_by_sector};
pub use map::{IndustryToSccMap, Scc};
