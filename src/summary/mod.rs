//! Summary Module: Void/Channel Metrics from Persistence Diagrams
//!
//! Reduces a persistence diagram to a flat, named set of scalars that can be
//! compared across materials:
//!
//! | metric                      | meaning                                   |
//! |-----------------------------|-------------------------------------------|
//! | `betti{k}_r{r}`             | βₖ at reference scale r (Å)               |
//! | `total_persistence_dim{k}`  | Σ finite lifetimes in dimension k         |
//! | `max_lifetime_dim{k}`       | longest finite lifetime in dimension k    |
//! | `persistence_entropy_dim{k}`| Shannon entropy of the finite lifetimes   |
//! | `feature_count_dim{k}`      | non-degenerate finite pairs               |
//! | `essential_count_dim{k}`    | classes alive at `r_max`                  |
//!
//! Zero-lifetime pairs are ignored by every lifetime metric. A dimension with
//! no finite pairs reports 0 rather than failing.

mod summarizer;

pub use summarizer::{betti_metric_name, Summarizer, TopologicalSummary};
