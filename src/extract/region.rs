//! Locating the planetary number box.

use crate::config::{PixelRect, PlanetaryRegion};

/// Prototype search boxes, narrowest first.
pub const CANDIDATE_REGIONS: [PlanetaryRegion; 4] = [
    candidate(0.80, 2, 2, 0.30),
    candidate(0.75, 5, 5, 0.35),
    candidate(0.70, 20, 20, 0.40),
    candidate(0.65, 10, 10, 0.45),
];

const fn candidate(left_fraction: f32, right_margin_px: u32, top_px: u32, bottom_fraction: f32) -> PlanetaryRegion {
    PlanetaryRegion {
        left_fraction,
        right_margin_px,
        top_px,
        bottom_fraction,
        region_search: false,
    }
}

impl PlanetaryRegion {
    /// Resolves the box against an image of `width` × `height`.
    ///
    /// Returns None when the box has zero area.
    pub fn locate(&self, width: u32, height: u32) -> Option<PixelRect> {
        let left = (self.left_fraction * width as f32) as u32;
        let right = width.saturating_sub(self.right_margin_px);
        let top = self.top_px;
        let bottom = ((self.bottom_fraction * height as f32) as u32).min(height);

        if right <= left || bottom <= top {
            return None;
        }

        Some(PixelRect {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        })
    }
}

/// Candidate boxes in priority order: the configured box alone, or the
/// prototype candidates when its `region_search` is set. Degenerate boxes
/// are skipped.
pub fn candidate_rects(configured: &PlanetaryRegion, width: u32, height: u32) -> Vec<PixelRect> {
    if configured.region_search {
        CANDIDATE_REGIONS
            .iter()
            .filter_map(|region| region.locate(width, height))
            .collect()
    } else {
        configured.locate(width, height).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_box() {
        let rect = PlanetaryRegion::default().locate(1000, 2000).unwrap();
        assert_eq!(rect, PixelRect { x: 650, y: 10, width: 340, height: 890 });
    }

    #[test]
    fn test_degenerate_box_is_none() {
        // Too narrow for the right margin
        assert!(PlanetaryRegion::default().locate(20, 2000).is_none());
        // Too short for the top offset
        assert!(PlanetaryRegion::default().locate(1000, 20).is_none());
        assert!(PlanetaryRegion::default().locate(0, 0).is_none());
    }

    #[test]
    fn test_candidates_narrowest_first() {
        let search = PlanetaryRegion {
            region_search: true,
            ..PlanetaryRegion::default()
        };
        let rects = candidate_rects(&search, 1000, 1000);
        assert_eq!(rects.len(), 4);
        assert_eq!(rects[0].x, 800);
        assert_eq!(rects[3].x, 650);
        assert!(rects.windows(2).all(|w| w[0].width <= w[1].width));
    }

    #[test]
    fn test_single_configured_box_without_search() {
        let rects = candidate_rects(&PlanetaryRegion::default(), 1000, 1000);
        assert_eq!(rects, vec![PlanetaryRegion::default().locate(1000, 1000).unwrap()]);
        assert!(candidate_rects(&PlanetaryRegion::default(), 5, 5).is_empty());
    }
}
