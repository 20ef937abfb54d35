//! Mutable declarations that become an immutable [`MeasurementFramework`].
//!
//! Dimensions may reference each other in any order; names are resolved
//! only when [`MeasurementFrameworkBuilder::build`] runs.
//!
//! [`MeasurementFramework`]: crate::MeasurementFramework

mod dimension;
mod framework;
mod locale;
mod rule;

use std::sync::atomic::{AtomicU64, Ordering};

pub use dimension::{DimensionBuilder, DimensionHandle};
pub use framework::MeasurementFrameworkBuilder;
pub use locale::LocaleBuilder;
pub use rule::DerivationRuleBuilder;

static NEXT_BUILDER_ID: AtomicU64 = AtomicU64::new(0);

/// Distinguishes framework builders so handles cannot cross between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct BuilderId(u64);

impl BuilderId {
    pub(crate) fn next() -> Self {
        Self(NEXT_BUILDER_ID.fetch_add(1, Ordering::Relaxed))
    }
}
