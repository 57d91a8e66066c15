//! CLAHE local contrast on the Lab `L` channel (`spec.md` §4.5 step 2).
//!
//! A standard Zuiderveld-style contrast-limited adaptive histogram
//! equalization: per-tile histograms with excess redistributed uniformly
//! after clipping, then bilinear interpolation of the per-tile mapping
//! functions across pixel position.

const TILES: usize = 8;
const BINS: usize = 256;

fn tile_bounds(tile_idx: usize, tiles: usize, extent: usize) -> (usize, usize) {
    let start = tile_idx * extent / tiles;
    let end = (tile_idx + 1) * extent / tiles;
    (start, end.max(start + 1).min(extent))
}

fn clip_histogram(hist: &mut [u32; BINS], clip_limit: u32) {
    if clip_limit == 0 {
        return;
    }
    let mut excess = 0u32;
    for count in hist.iter_mut() {
        if *count > clip_limit {
            excess += *count - clip_limit;
            *count = clip_limit;
        }
    }
    let redistribute = excess / BINS as u32;
    let remainder = excess % BINS as u32;
    for (i, count) in hist.iter_mut().enumerate() {
        *count += redistribute;
        if (i as u32) < remainder {
            *count += 1;
        }
    }
}

fn build_mapping(hist: &[u32; BINS], tile_pixels: u32) -> [f32; BINS] {
    let mut cdf = [0f32; BINS];
    let mut running = 0u32;
    for (i, &count) in hist.iter().enumerate() {
        running += count;
        cdf[i] = running as f32 / tile_pixels.max(1) as f32;
    }
    cdf
}

/// Runs CLAHE over a single-channel `L` buffer in `[0, 100]`, returning the
/// equalized buffer (also `[0, 100]`). `clip_limit_strength` is the Lab
/// kernel's `clahe_strength` slider; the actual OpenCV-style clip limit is
/// `5 * clahe_strength`.
pub fn clahe_l_channel(l: &[f32], w: usize, h: usize, clahe_strength: f32) -> Vec<f32> {
    let clip_limit_factor = 5.0 * clahe_strength.max(0.0);

    let (tx, ty) = (TILES.min(w.max(1)), TILES.min(h.max(1)));
    let mut mappings = vec![[0f32; BINS]; tx * ty];

    for ty_idx in 0..ty {
        let (y0, y1) = tile_bounds(ty_idx, ty, h);
        for tx_idx in 0..tx {
            let (x0, x1) = tile_bounds(tx_idx, tx, w);
            let mut hist = [0u32; BINS];
            let mut tile_pixels = 0u32;
            for y in y0..y1 {
                for x in x0..x1 {
                    let bin = ((l[y * w + x] / 100.0).clamp(0.0, 1.0) * (BINS - 1) as f32).round() as usize;
                    hist[bin] += 1;
                    tile_pixels += 1;
                }
            }
            let clip_limit = ((clip_limit_factor * tile_pixels as f32 / BINS as f32).round() as u32).max(1);
            clip_histogram(&mut hist, clip_limit);
            mappings[ty_idx * tx + tx_idx] = build_mapping(&hist, tile_pixels);
        }
    }

    let tile_center = |idx: usize, tiles: usize, extent: usize| -> f32 {
        let (s, e) = tile_bounds(idx, tiles, extent);
        (s + e) as f32 / 2.0
    };
    let centers_x: Vec<f32> = (0..tx).map(|i| tile_center(i, tx, w)).collect();
    let centers_y: Vec<f32> = (0..ty).map(|i| tile_center(i, ty, h)).collect();

    let mut out = vec![0f32; w * h];
    for y in 0..h {
        let py = y as f32;
        let (ty0, ty1, wy) = neighbor_tiles(py, &centers_y);
        for x in 0..w {
            let px = x as f32;
            let (tx0, tx1, wx) = neighbor_tiles(px, &centers_x);
            let bin = ((l[y * w + x] / 100.0).clamp(0.0, 1.0) * (BINS - 1) as f32).round() as usize;

            let v00 = mappings[ty0 * tx + tx0][bin];
            let v10 = mappings[ty0 * tx + tx1][bin];
            let v01 = mappings[ty1 * tx + tx0][bin];
            let v11 = mappings[ty1 * tx + tx1][bin];

            let top = v00 * (1.0 - wx) + v10 * wx;
            let bottom = v01 * (1.0 - wx) + v11 * wx;
            out[y * w + x] = (top * (1.0 - wy) + bottom * wy) * 100.0;
        }
    }
    out
}

/// Finds the two tile-center indices bracketing `pos` along one axis and
/// the interpolation weight between them, clamping at the array ends.
fn neighbor_tiles(pos: f32, centers: &[f32]) -> (usize, usize, f32) {
    if centers.len() == 1 {
        return (0, 0, 0.0);
    }
    if pos <= centers[0] {
        return (0, 0, 0.0);
    }
    if pos >= centers[centers.len() - 1] {
        let last = centers.len() - 1;
        return (last, last, 0.0);
    }
    for i in 0..centers.len() - 1 {
        if pos >= centers[i] && pos <= centers[i + 1] {
            let w = (pos - centers[i]) / (centers[i + 1] - centers[i]).max(1e-6);
            return (i, i + 1, w);
        }
    }
    (centers.len() - 1, centers.len() - 1, 0.0)
}
