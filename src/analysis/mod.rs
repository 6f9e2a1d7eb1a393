//! Center/channel analysis.
//!
//! A pure function of the two activated gate sets:
//! - union the design and personality gates
//! - a channel is defined when both of its gates are activated
//! - a center is defined when at least one defined channel touches it

pub mod activation;

pub use activation::{classify, gates_with};

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{Activation, PlanetaryChart};
use crate::reference::{Center, Channel, CHANNELS};

#[derive(Debug, Clone)]
pub struct ChartAnalysis {
    pub activated: BTreeSet<u8>,
    pub activations: BTreeMap<u8, Activation>,
    pub defined_channels: Vec<&'static Channel>,
    pub defined_centers: BTreeSet<Center>,
}

impl ChartAnalysis {
    pub fn is_center_defined(&self, center: Center) -> bool {
        self.defined_centers.contains(&center)
    }

    pub fn is_channel_defined(&self, channel: &Channel) -> bool {
        self.defined_channels.iter().any(|c| c.gates == channel.gates)
    }
}

pub fn analyze(design: &BTreeSet<u8>, personality: &BTreeSet<u8>) -> ChartAnalysis {
    let activated: BTreeSet<u8> = design.union(personality).copied().collect();

    let defined_channels: Vec<&'static Channel> = CHANNELS
        .iter()
        .filter(|channel| channel.is_defined(&activated))
        .collect();

    let defined_centers: BTreeSet<Center> = defined_channels
        .iter()
        .flat_map(|channel| channel.centers)
        .collect();

    ChartAnalysis {
        activations: classify(design, personality),
        activated,
        defined_channels,
        defined_centers,
    }
}

pub fn analyze_chart(chart: &PlanetaryChart) -> ChartAnalysis {
    analyze(&chart.design_gates(), &chart.personality_gates())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CandidatePair;

    fn reference_chart() -> PlanetaryChart {
        let red = [
            "42.5", "32.3", "48.6", "49.4", "16.2", "20.6", "9.2", "34.6", "27.5", "7.2", "17.6",
            "56.6", "14.4",
        ];
        let black = [
            "62.3", "61.3", "1.3", "38.4", "58.3", "1.2", "44.3", "5.2", "9.5", "10.4", "10.2",
            "50.5", "50.4",
        ];
        let pairs: Vec<CandidatePair> = red
            .iter()
            .zip(black.iter())
            .map(|(r, b)| CandidatePair::new(*r, *b))
            .collect();
        PlanetaryChart::from_pairs(&pairs).0
    }

    #[test]
    fn test_reference_chart_channels_and_centers() {
        let analysis = analyze_chart(&reference_chart());

        let ids: Vec<String> = analysis.defined_channels.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["10-20", "10-34", "16-48", "17-62", "20-34", "27-50"]);

        let centers: Vec<Center> = analysis.defined_centers.iter().copied().collect();
        assert_eq!(
            centers,
            vec![Center::Ajna, Center::Throat, Center::G, Center::Spleen, Center::Sacral]
        );
        assert!(!analysis.is_center_defined(Center::Root));
        assert!(!analysis.is_center_defined(Center::Head));
    }

    #[test]
    fn test_reference_chart_activations() {
        let analysis = analyze_chart(&reference_chart());

        assert_eq!(analysis.activated.len(), 22);
        assert_eq!(gates_with(&analysis.activations, Activation::Both), vec![9]);
        assert_eq!(
            gates_with(&analysis.activations, Activation::ConsciousOnly),
            vec![1, 5, 10, 38, 44, 50, 58, 61, 62]
        );
        assert_eq!(
            gates_with(&analysis.activations, Activation::UnconsciousOnly),
            vec![7, 14, 16, 17, 20, 27, 32, 34, 42, 48, 49, 56]
        );
    }

    #[test]
    fn test_analysis_is_order_independent() {
        let a = analyze(&BTreeSet::from([20, 57]), &BTreeSet::from([10]));
        let b = analyze(&BTreeSet::from([10]), &BTreeSet::from([57, 20]));
        let ids = |x: &ChartAnalysis| x.defined_channels.iter().map(|c| c.id()).collect::<Vec<_>>();
        assert_eq!(ids(&a), ids(&b));
        assert_eq!(a.defined_centers, b.defined_centers);
        assert_eq!(ids(&a), vec!["10-20", "10-57", "20-57"]);
    }

    #[test]
    fn test_no_channels_means_no_defined_centers() {
        let analysis = analyze(&BTreeSet::from([1, 3]), &BTreeSet::from([64]));
        assert!(analysis.defined_channels.is_empty());
        assert!(analysis.defined_centers.is_empty());
    }
}
