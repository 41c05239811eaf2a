//! Output-event synthesis: combines the specular pair with the diffuse
//! image into exactly the number of events the caller asked for.

use gisans_core::ScatterEvent;
use rand::seq::SliceRandom;
use rand::Rng;

/// Detector dimension guaranteeing at least `odim − 2` diffuse candidates,
/// so the synthesizer never runs short of events.
pub fn det_dim_for(odim: usize) -> usize {
    ((odim.saturating_sub(3) as f64).sqrt().ceil() as usize) + 1
}

/// Builds the response event list: slot 0 is the reflected event, slot 1
/// the transmitted event, the remainder diffuse events. Surplus diffuse
/// events are shuffled and truncated so the discarded pixels are unbiased;
/// a shortfall is padded with zero-weight events along the transmitted
/// direction. The result always has exactly `odim` entries (the caller
/// relies on the count and on the slot-0/slot-1 ordering).
pub fn synthesize<R: Rng>(
    reflected: ScatterEvent,
    transmitted: ScatterEvent,
    mut diffuse: Vec<ScatterEvent>,
    odim: usize,
    rng: &mut R,
) -> Vec<ScatterEvent> {
    let budget = odim.saturating_sub(2);
    if diffuse.len() > budget {
        diffuse.shuffle(rng);
        diffuse.truncate(budget);
    }
    while diffuse.len() < budget {
        diffuse.push(ScatterEvent { p: 0.0, v: transmitted.v });
    }

    let mut out = Vec::with_capacity(odim);
    out.push(reflected);
    out.push(transmitted);
    out.extend(diffuse);
    out.truncate(odim);
    out
}
