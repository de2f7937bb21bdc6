//! Synthetic job locations weighted by each city's share of tech hiring.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// (city, share of all postings). Shares sum below one; the rest is tier 2.
pub const PRIMARY_CITIES: &[(&str, f64)] = &[
    ("Delhi NCR", 0.195),
    ("Bengaluru", 0.16),
    ("Mumbai", 0.15),
    ("Chennai", 0.09),
    ("Pune", 0.085),
    ("Hyderabad", 0.085),
    ("Kolkata", 0.035),
    ("Ahmedabad", 0.03),
];

pub const TIER_TWO_CITIES: &[&str] = &[
    "Kochi",
    "Jaipur",
    "Thiruvananthapuram",
    "Coimbatore",
    "Visakhapatnam",
    "Indore",
    "Lucknow",
    "Chandigarh",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationAssignment {
    pub job_id: i64,
    pub location: String,
}

/// Unique ids in first-seen order.
pub fn unique_job_ids(ids: impl IntoIterator<Item = i64>) -> Vec<i64> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// One location per id. Each primary city receives `round(n * share)`
/// slots, the remainder are random tier-2 cities, then the slots are shuffled.
pub fn assign_locations<R: Rng + ?Sized>(job_ids: &[i64], rng: &mut R) -> Vec<LocationAssignment> {
    let total = job_ids.len();
    let mut slots: Vec<&str> = Vec::with_capacity(total);
    for (city, share) in PRIMARY_CITIES {
        let count = (total as f64 * share).round_ties_even() as usize;
        slots.extend(std::iter::repeat(*city).take(count));
    }
    if slots.len() > total {
        slots.truncate(total);
    }
    while slots.len() < total {
        slots.push(TIER_TWO_CITIES[rng.random_range(0..TIER_TWO_CITIES.len())]);
    }
    slots.shuffle(rng);

    job_ids
        .iter()
        .zip(slots)
        .map(|(&job_id, city)| LocationAssignment {
            job_id,
            location: city.to_string(),
        })
        .collect()
}
