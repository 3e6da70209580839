//! Independent analyses for many locations
//!
//! Every request is analysed on its own; the work is spread over the
//! rayon pool and results come back in request order.

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::models::{Location, Sample, TargetDate, ThresholdSet};

use super::report::{AnalysisPolicy, ClimateReport, analyze_for_date};

/// One (location, date) analysis
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub location: Location,
    pub target: TargetDate,
    pub sample: Sample,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationReport {
    pub location: Location,
    pub report: ClimateReport,
}

/// Analyse every request in parallel.
///
/// A failing request (bad coordinates, invalid thresholds) yields an `Err`
/// in its slot without affecting the others.
#[must_use]
pub fn analyze_batch(
    requests: &[AnalysisRequest],
    thresholds: &ThresholdSet,
    policy: &AnalysisPolicy,
    reference_year: i32,
) -> Vec<Result<LocationReport>> {
    debug!(requests = requests.len(), "Starting batch analysis");
    requests
        .par_iter()
        .map(|request| {
            request.location.validate()?;
            let report = analyze_for_date(
                &request.sample,
                request.target,
                thresholds,
                policy,
                reference_year,
            )?;
            Ok(LocationReport {
                location: request.location.clone(),
                report,
            })
        })
        .collect()
}
