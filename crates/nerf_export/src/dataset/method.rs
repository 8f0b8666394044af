use std::fmt;
use std::str::FromStr;

use crate::config::{CosSettings, DfcSettings, ExportSettings, SofSettings, TtcSettings};

/// Payload-free tag of a sampling method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    /// Subset of Frames
    Sof,
    /// Train and Test Cameras
    Ttc,
    /// Camera on Sphere
    Cos,
    /// Dataset From Cameras
    Dfc,
}

impl MethodKind {
    /// Every method, in panel order
    pub const ALL: [MethodKind; 4] = [Self::Sof, Self::Ttc, Self::Cos, Self::Dfc];

    /// Short uppercase tag
    pub fn tag(self) -> &'static str {
        match self {
            Self::Sof => "SOF",
            Self::Ttc => "TTC",
            Self::Cos => "COS",
            Self::Dfc => "DFC",
        }
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Unknown method tag
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown sampling method '{0}' (expected one of sof, ttc, cos, dfc)")]
pub struct UnknownMethod(pub String);

impl FromStr for MethodKind {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

/// A sampling method with its parameters
#[derive(Debug, Clone, PartialEq)]
pub enum SamplingMethod {
    /// Every N-th frame of the active camera for training, the full range for testing
    SubsetOfFrames(SofSettings),
    /// One camera for training and another for testing
    TrainTestCameras(TtcSettings),
    /// Random views on a sphere for training, the active camera for testing
    CameraOnSphere(CosSettings),
    /// One view per camera of a named collection
    DatasetFromCameras(DfcSettings),
}

impl SamplingMethod {
    /// Pick the parameters of `kind` out of `settings`
    pub fn from_settings(settings: &ExportSettings, kind: MethodKind) -> Self {
        match kind {
            MethodKind::Sof => Self::SubsetOfFrames(settings.sof.clone()),
            MethodKind::Ttc => Self::TrainTestCameras(settings.ttc.clone()),
            MethodKind::Cos => Self::CameraOnSphere(settings.cos.clone()),
            MethodKind::Dfc => Self::DatasetFromCameras(settings.dfc.clone()),
        }
    }

    /// Tag of this method
    pub fn kind(&self) -> MethodKind {
        match self {
            Self::SubsetOfFrames(_) => MethodKind::Sof,
            Self::TrainTestCameras(_) => MethodKind::Ttc,
            Self::CameraOnSphere(_) => MethodKind::Cos,
            Self::DatasetFromCameras(_) => MethodKind::Dfc,
        }
    }

    /// Dataset name configured for this method
    pub fn dataset_name(&self) -> &str {
        match self {
            Self::SubsetOfFrames(sof) => &sof.dataset_name,
            Self::TrainTestCameras(ttc) => &ttc.dataset_name,
            Self::CameraOnSphere(cos) => &cos.dataset_name,
            Self::DatasetFromCameras(dfc) => &dfc.dataset_name,
        }
    }
}
