//! Easing curves mapping linear progress onto eased progress

use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Easing {
    #[default]
    None,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InQuint,
    OutQuint,
    InSine,
    OutSine,
    InOutSine,
    InExpo,
    OutExpo,
}

impl Easing {
    /// Eased progress for `p` in `0.0..=1.0`. Every curve maps 0 to 0 and
    /// 1 to 1.
    pub fn apply(self, p: f64) -> f64 {
        match self {
            Easing::None => p,
            Easing::InQuad => p * p,
            Easing::OutQuad => p * (2.0 - p),
            Easing::InOutQuad => {
                if p < 0.5 {
                    2.0 * p * p
                } else {
                    1.0 - 2.0 * (1.0 - p) * (1.0 - p)
                }
            }
            Easing::InCubic => p * p * p,
            Easing::OutCubic => 1.0 - (1.0 - p).powi(3),
            Easing::InOutCubic => {
                if p < 0.5 {
                    4.0 * p * p * p
                } else {
                    1.0 - 4.0 * (1.0 - p).powi(3)
                }
            }
            Easing::InQuint => p.powi(5),
            Easing::OutQuint => 1.0 - (1.0 - p).powi(5),
            Easing::InSine => 1.0 - (p * PI / 2.0).cos(),
            Easing::OutSine => (p * PI / 2.0).sin(),
            Easing::InOutSine => 0.5 - 0.5 * (p * PI).cos(),
            Easing::InExpo => {
                if p <= 0.0 {
                    0.0
                } else {
                    2f64.powf(10.0 * (p - 1.0))
                }
            }
            Easing::OutExpo => {
                if p >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * p)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Easing::None)]
    #[test_case(Easing::InQuad)]
    #[test_case(Easing::OutQuad)]
    #[test_case(Easing::InOutQuad)]
    #[test_case(Easing::InCubic)]
    #[test_case(Easing::OutCubic)]
    #[test_case(Easing::InOutCubic)]
    #[test_case(Easing::InQuint)]
    #[test_case(Easing::OutQuint)]
    #[test_case(Easing::InSine)]
    #[test_case(Easing::OutSine)]
    #[test_case(Easing::InOutSine)]
    #[test_case(Easing::InExpo)]
    #[test_case(Easing::OutExpo)]
    fn test_easing_endpoints(easing: Easing) {
        assert!(easing.apply(0.0).abs() < 1e-9);
        assert!((easing.apply(1.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_out_curves_lead_in_curves() {
        assert!(Easing::OutQuad.apply(0.25) > Easing::None.apply(0.25));
        assert!(Easing::InQuad.apply(0.25) < Easing::None.apply(0.25));
    }
}
