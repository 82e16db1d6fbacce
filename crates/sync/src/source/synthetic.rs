//! Synthetic source -- generates a plausible month when the real source is
//! unavailable.
//!
//! Every day of the month gets an entry. Weekend days are rest days with
//! probability 0.7; every other day is a morning, afternoon or night shift
//! picked uniformly, with a random service and location.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use roster_core::serde_fmt::format_date;
use roster_core::{AssignmentStatus, ExternalShift, Period, ShiftKind, SourceRoster};
use time::macros::time;
use time::{Time, Weekday};

use super::{default_reference, SourceAdapter};
use crate::error::SourceError;

const WEEKEND_REST_PROBABILITY: f64 = 0.7;
const WORKING_KINDS: [ShiftKind; 3] = [ShiftKind::Morning, ShiftKind::Afternoon, ShiftKind::Night];
const SERVICES: [&str; 3] = ["Service A", "Service B", "Service C"];
const LOCATIONS: [&str; 3] = ["Floor 1", "Floor 2", "Floor 3"];

/// Standard hours of a working shift kind. Night shifts end the next morning.
pub fn shift_hours(kind: ShiftKind) -> Option<(Time, Time)> {
    match kind {
        ShiftKind::Morning => Some((time!(7:00), time!(15:00))),
        ShiftKind::Afternoon => Some((time!(15:00), time!(23:00))),
        ShiftKind::Night => Some((time!(23:00), time!(7:00))),
        ShiftKind::Rest => None,
    }
}

/// Adapter producing a generated month.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticSource {
    seed: Option<u64>,
}

impl SyntheticSource {
    /// Draws a fresh month from OS entropy on every fetch.
    pub fn random() -> Self {
        SyntheticSource { seed: None }
    }

    /// Produces the same month for the same seed, employee and period.
    pub fn seeded(seed: u64) -> Self {
        SyntheticSource { seed: Some(seed) }
    }

    pub fn generate(&self, employee_id: &str, period: Period) -> SourceRoster {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        generate_month(&mut rng, employee_id, period)
    }
}

#[async_trait]
impl SourceAdapter for SyntheticSource {
    async fn fetch(&self, employee_id: &str, period: Period) -> Result<SourceRoster, SourceError> {
        tracing::info!(
            employee_id,
            period = %period,
            seed = ?self.seed,
            "generating synthetic roster"
        );
        Ok(self.generate(employee_id, period))
    }

    fn adapter_id(&self) -> &str {
        "synthetic"
    }
}

fn generate_month<R: Rng>(rng: &mut R, employee_id: &str, period: Period) -> SourceRoster {
    let shifts = period
        .days()
        .map(|date| {
            let weekend = matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday);
            let kind = if weekend && rng.gen_bool(WEEKEND_REST_PROBABILITY) {
                ShiftKind::Rest
            } else {
                WORKING_KINDS[rng.gen_range(0..WORKING_KINDS.len())]
            };
            let hours = shift_hours(kind);
            let (service, location) = if kind.is_rest() {
                (None, None)
            } else {
                (
                    SERVICES.choose(&mut *rng).map(|s| s.to_string()),
                    LOCATIONS.choose(&mut *rng).map(|s| s.to_string()),
                )
            };
            ExternalShift {
                date,
                start_time: hours.map(|(start, _)| start),
                end_time: hours.map(|(_, end)| end),
                kind,
                service,
                location,
                status: AssignmentStatus::Confirmed,
                external_id: Some(format!("OCT-SHIFT-{}-{}", format_date(date), employee_id)),
            }
        })
        .collect();

    SourceRoster {
        reference: Some(default_reference(employee_id, period)),
        shifts,
        rejected: Vec::new(),
    }
}
