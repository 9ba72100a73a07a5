use crate::config::constants::MIN_GRADIENT;
use crate::config::parameters::ModelParameters;
use crate::core::results::{GeologyOutput, SimulationWarning, WarningLog};

/// One gradient segment; the last one extends without bound.
#[derive(Debug, Clone, Copy)]
struct Segment {
    top_depth: f64,
    top_temperature: f64,
    gradient: f64,
    thickness: Option<f64>,
}

fn segments(params: &ModelParameters) -> Vec<Segment> {
    let sub = &params.subsurface;
    let mut top_depth = 0.0;
    let mut top_temperature = params.surface.surface_temperature;
    let mut result = Vec::with_capacity(sub.gradients.len());
    for (i, &gradient) in sub.gradients.iter().enumerate() {
        let gradient = if gradient > 0.0 { gradient } else { MIN_GRADIENT };
        let thickness = sub.layer_thicknesses.get(i).copied();
        result.push(Segment { top_depth, top_temperature, gradient, thickness });
        if let Some(thickness) = thickness {
            top_depth += thickness;
            top_temperature += gradient * thickness;
        }
    }
    result
}

/// Depth at which the layered gradient profile reaches the maximum temperature.
pub fn max_well_depth(params: &ModelParameters) -> f64 {
    let max_temperature = params.subsurface.max_temperature;
    let segments = segments(params);
    for segment in &segments {
        let reaches_max = match segment.thickness {
            Some(thickness) => segment.top_temperature + segment.gradient * thickness > max_temperature,
            None => true,
        };
        if reaches_max {
            return segment.top_depth + (max_temperature - segment.top_temperature) / segment.gradient;
        }
    }
    f64::INFINITY
}

/// Rock temperature at `depth` from the segment containing it.
pub fn rock_temperature_at(params: &ModelParameters, depth: f64) -> f64 {
    let segments = segments(params);
    let segment = segments
        .iter()
        .rev()
        .find(|s| depth > s.top_depth)
        .or_else(|| segments.first());
    match segment {
        Some(s) => s.top_temperature + s.gradient * (depth - s.top_depth),
        None => params.surface.surface_temperature,
    }
}

/// Caps the well depth at the maximum-temperature depth and derives the initial
/// rock temperature and average gradient.
pub fn resolve_geology(params: &ModelParameters, warnings: &mut WarningLog) -> GeologyOutput {
    let requested = params.subsurface.depth;
    let max_depth = max_well_depth(params);
    let depth = if requested > max_depth {
        warnings.record(SimulationWarning::DepthCapped { requested, capped: max_depth });
        max_depth
    } else {
        requested
    };

    let rock_temperature = rock_temperature_at(params, depth);
    let average_gradient = if params.subsurface.gradients.len() == 1 {
        segments(params)[0].gradient
    } else {
        (rock_temperature - params.surface.surface_temperature) / depth
    };

    GeologyOutput {
        depth,
        max_depth,
        rock_temperature,
        average_gradient,
    }
}
