//! Fluent builder for constructing a [`Federation`].

use std::collections::{BTreeSet, HashSet};

use fc_bus::{Federate, Mailbox};
use fc_core::{CrossingConfig, FederateClock, LogicalTime};
use fc_ferry::FerryFederate;
use fc_station::StationFederate;

use crate::federation::{Bus, Member};
use crate::{ControllerFederate, Federation, SimError, SimResult};

/// Fluent builder for [`Federation`].
///
/// # Optional inputs (have defaults)
///
/// | Method                       | Default            |
/// |------------------------------|--------------------|
/// | `.max_time(t)`               | `100_000.0`        |
/// | `.fail_transport_after(n)`   | never fails        |
///
/// Federates join in the order they are added; join order breaks ties
/// between equal advance requests.
///
/// # Example
///
/// ```rust,ignore
/// let mut federation = FederationBuilder::new(1.0)
///     .join(ControllerFederate::from_config(&config))
///     .join(StationFederate::from_config(&config))
///     .join(FerryFederate::from_config(&config))
///     .build()?;
/// federation.run(&mut NoopObserver)?;
/// ```
pub struct FederationBuilder {
    lookahead:  f64,
    max_time:   f64,
    fail_after: Option<u64>,
    federates:  Vec<Box<dyn Federate>>,
}

impl FederationBuilder {
    pub fn new(lookahead: f64) -> Self {
        Self { lookahead, max_time: 100_000.0, fail_after: None, federates: Vec::new() }
    }

    /// Controller, station and ferry federates wired from one config.
    pub fn crossing(config: &CrossingConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self::new(config.lookahead)
            .max_time(config.max_time)
            .join(ControllerFederate::from_config(config))
            .join(StationFederate::from_config(config))
            .join(FerryFederate::from_config(config)))
    }

    /// Refuse to grant any advance past `t`.
    pub fn max_time(mut self, t: f64) -> Self {
        self.max_time = t;
        self
    }

    /// Make every bus call after the first `n` successful ones fail with a
    /// transport error.
    pub fn fail_transport_after(mut self, n: u64) -> Self {
        self.fail_after = Some(n);
        self
    }

    pub fn join(self, federate: impl Federate) -> Self {
        self.join_boxed(Box::new(federate))
    }

    pub fn join_boxed(mut self, federate: Box<dyn Federate>) -> Self {
        self.federates.push(federate);
        self
    }

    /// Validate inputs and return a federation ready to run.
    pub fn build(self) -> SimResult<Federation> {
        if !self.lookahead.is_finite() || self.lookahead <= 0.0 {
            return Err(SimError::Setup(format!("lookahead must be positive, got {}", self.lookahead)));
        }
        let max_time = LogicalTime::new(self.max_time)
            .filter(|t| t.value() > 0.0)
            .ok_or_else(|| SimError::Setup(format!("max_time must be positive, got {}", self.max_time)))?;
        if self.federates.is_empty() {
            return Err(SimError::Setup("federation has no federates".into()));
        }
        if u32::try_from(self.federates.len()).is_err() {
            return Err(SimError::Setup("too many federates".into()));
        }

        let mut names = HashSet::new();
        let mut bus = Bus::new(self.fail_after);
        for federate in &self.federates {
            let name = federate.name().to_owned();
            if !names.insert(name.clone()) {
                return Err(SimError::Setup(format!("duplicate federate name {name:?}")));
            }
            bus.members.push(Member {
                name,
                declarations: federate.declarations(),
                clock:        FederateClock::new(self.lookahead),
                mailbox:      Mailbox::new(),
                requested:    None,
                resigned:     false,
                discovered:   BTreeSet::new(),
            });
        }

        Ok(Federation {
            federates: self.federates,
            bus,
            max_time,
            now: LogicalTime::ZERO,
            started: false,
        })
    }
}
