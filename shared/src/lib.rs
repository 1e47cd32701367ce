pub mod classification;
pub mod feature;
pub mod params;

pub use classification::{classification_color, classification_name};
pub use feature::{Feature, FeatureKindInfo, feature_kind_info, feature_kinds};
pub use params::*;
