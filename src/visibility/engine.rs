use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rayon::prelude::*;

use super::error::VisibilityError;
use super::types::{PairKey, SatelliteEntry, VesselEntry, VisibilityPair, VisibilityReport};
use crate::ephemeris::{nearest, Ephemeris, Observer, OrbitalElementSet};
use crate::geo::{horizon_angle_deg, EARTH_RADIUS_KM};
use crate::track::{reconcile, TrackPoint, VesselEstimate};

/// Default minimum elevation for a hit, in degrees.
pub const DEFAULT_MIN_ELEVATION_DEG: f64 = 5.0;

/// Scope and threshold options for one report.
#[derive(Debug, Clone)]
pub struct HitOptions {
    /// Minimum elevation above the horizon for a pair to count as a hit.
    /// The comparison is strict: a pair exactly at the threshold misses.
    pub min_elevation_deg: f64,
    /// Satellites to consider; `None` means every id present in the table.
    pub satellite_ids: Option<Vec<u32>>,
    /// Vessels to consider; `None` means every id present in the table.
    pub vessel_ids: Option<Vec<u32>>,
}

impl Default for HitOptions {
    fn default() -> Self {
        Self {
            min_elevation_deg: DEFAULT_MIN_ELEVATION_DEG,
            satellite_ids: None,
            vessel_ids: None,
        }
    }
}

struct ResolvedSatellite<'a> {
    entry: SatelliteEntry,
    elements: &'a OrbitalElementSet,
}

/// Compute the satellite/vessel visibility report for one instant.
///
/// Vessel reconciliation and satellite resolution run as independent
/// parallel passes, then the pair fan-out runs as a parallel map over the
/// cross product of the resolved entities. Entities that cannot be
/// resolved are reported in the `unresolved_*` lists rather than aborting
/// the report.
pub fn find_hits<E>(
    target: DateTime<Utc>,
    elements_table: &[OrbitalElementSet],
    track_table: &[TrackPoint],
    ephemeris: &E,
    options: &HitOptions,
) -> Result<VisibilityReport, VisibilityError>
where
    E: Ephemeris + Sync,
{
    if elements_table.is_empty() {
        return Err(VisibilityError::EmptyElements);
    }
    if track_table.is_empty() {
        return Err(VisibilityError::EmptyTracks);
    }

    let satellite_ids = match &options.satellite_ids {
        Some(ids) => ids.clone(),
        None => distinct(elements_table.iter().map(|s| s.satellite_id)),
    };
    let vessel_ids = match &options.vessel_ids {
        Some(ids) => ids.clone(),
        None => distinct(track_table.iter().map(|p| p.vessel_id)),
    };

    let (vessel_pass, satellite_pass) = rayon::join(
        || resolve_vessels(&vessel_ids, track_table, target),
        || resolve_satellites(&satellite_ids, elements_table, ephemeris, target),
    );
    let (estimates, unresolved_vessels) = vessel_pass;
    let (satellites, unresolved_satellites) = satellite_pass;

    let pairs: BTreeMap<PairKey, VisibilityPair> = satellites
        .par_iter()
        .flat_map_iter(|sat| estimates.iter().map(move |est| (sat, est)))
        .filter_map(|(sat, est)| {
            pair_aer(sat, est, target, ephemeris, options.min_elevation_deg)
        })
        .map(|pair| {
            (
                PairKey {
                    satellite_id: pair.sat_id,
                    vessel_id: pair.ves_id,
                },
                pair,
            )
        })
        .collect();

    Ok(VisibilityReport {
        utc: target,
        satellites: satellites.into_iter().map(|s| s.entry).collect(),
        vessels: estimates.iter().map(vessel_entry).collect(),
        pairs,
        unresolved_satellites,
        unresolved_vessels,
    })
}

fn resolve_vessels(
    ids: &[u32],
    table: &[TrackPoint],
    target: DateTime<Utc>,
) -> (Vec<VesselEstimate>, Vec<u32>) {
    let results: Vec<_> = ids
        .par_iter()
        .map(|&id| (id, reconcile(table, id, target)))
        .collect();

    let mut estimates = Vec::new();
    let mut unresolved = Vec::new();
    for (id, result) in results {
        match result {
            Ok(estimate) => estimates.push(estimate),
            Err(e) => {
                log::warn!("vessel {id} unresolvable at {target}: {e}");
                unresolved.push(id);
            }
        }
    }
    (estimates, unresolved)
}

fn resolve_satellites<'a, E>(
    ids: &[u32],
    table: &'a [OrbitalElementSet],
    ephemeris: &E,
    target: DateTime<Utc>,
) -> (Vec<ResolvedSatellite<'a>>, Vec<u32>)
where
    E: Ephemeris + Sync,
{
    let results: Vec<_> = ids
        .par_iter()
        .map(|&id| {
            let elements = match nearest(table, id, target) {
                Some(elements) => elements,
                None => {
                    log::warn!("satellite {id}: no element sets in scope");
                    return (id, None);
                }
            };
            match ephemeris.subpoint(elements, target) {
                Ok(subpoint) => (
                    id,
                    Some(ResolvedSatellite {
                        entry: SatelliteEntry {
                            id,
                            lat: subpoint.latitude_deg,
                            lon: subpoint.longitude_deg,
                            alt: subpoint.altitude_km,
                            horizon: horizon_angle_deg(subpoint.altitude_km, EARTH_RADIUS_KM),
                        },
                        elements,
                    }),
                ),
                Err(e) => {
                    log::warn!("satellite {id}: ephemeris failed at {target}: {e}");
                    (id, None)
                }
            }
        })
        .collect();

    let mut resolved = Vec::new();
    let mut unresolved = Vec::new();
    for (id, result) in results {
        match result {
            Some(satellite) => resolved.push(satellite),
            None => unresolved.push(id),
        }
    }
    (resolved, unresolved)
}

fn pair_aer<E: Ephemeris>(
    sat: &ResolvedSatellite<'_>,
    est: &VesselEstimate,
    target: DateTime<Utc>,
    ephemeris: &E,
    min_elevation_deg: f64,
) -> Option<VisibilityPair> {
    let observer = Observer::at_sea_level(est.position);
    match ephemeris.observe(sat.elements, target, &observer) {
        Ok(aer) => Some(VisibilityPair {
            sat_id: sat.entry.id,
            ves_id: est.vessel_id,
            azimuth: aer.azimuth_deg,
            elevation: aer.elevation_deg,
            range: aer.range_km,
            hit: aer.elevation_deg > min_elevation_deg,
        }),
        Err(e) => {
            log::warn!(
                "pair {},{}: ephemeris failed at {target}: {e}",
                sat.entry.id,
                est.vessel_id
            );
            None
        }
    }
}

fn vessel_entry(est: &VesselEstimate) -> VesselEntry {
    VesselEntry {
        id: est.vessel_id,
        lat: est.position.latitude_deg,
        lon: est.position.longitude_deg,
        alt: 0.0,
        method: est.method,
        nearest_ais: est.bracket,
        delta_t: est.delta_t_hours,
        sog: est.speed_kmh,
        cog: est.course_deg,
    }
}

fn distinct(ids: impl Iterator<Item = u32>) -> Vec<u32> {
    let mut seen = Vec::new();
    for id in ids {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}
