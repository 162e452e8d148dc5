//! Pure catalogue views: grouping for the list and the recommendation.
//!
//! Nothing here touches the store or holds state; every function is a
//! deterministic function of its inputs (plus the injected random source).

pub mod group;
pub mod recommend;
