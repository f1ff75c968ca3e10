//! Problem families understood by the solver.

use std::fmt;
use std::str::FromStr;

use crate::instance::InstanceError;

/// The optimisation problem an [`Instance`](crate::Instance) encodes.
///
/// Each family has a single-letter code used on the wire and on the command
/// line: `M` for Max-Cut and `Q` for QUBO.
///
/// # Examples
///
/// ```
/// use mqlib_core::ProblemFamily;
///
/// let family: ProblemFamily = "Q".parse()?;
/// assert_eq!(family, ProblemFamily::Qubo);
/// assert_eq!(family.code(), "Q");
/// # Ok::<(), mqlib_core::InstanceError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProblemFamily {
    /// Maximum cut on an undirected weighted graph.
    #[cfg_attr(feature = "serde", serde(rename = "M"))]
    MaxCut,
    /// Quadratic unconstrained binary optimisation over a symmetric matrix.
    #[cfg_attr(feature = "serde", serde(rename = "Q"))]
    Qubo,
}

impl ProblemFamily {
    /// Single-letter wire code for the family.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::MaxCut => "M",
            Self::Qubo => "Q",
        }
    }

    /// Human-readable name used as the catalogue key.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MaxCut => "MaxCut",
            Self::Qubo => "QUBO",
        }
    }

    /// Whether instances of this family may be built from graph input.
    #[must_use]
    pub const fn accepts_graph_input(self) -> bool {
        matches!(self, Self::MaxCut)
    }
}

impl fmt::Display for ProblemFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProblemFamily {
    type Err = InstanceError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "M" => Ok(Self::MaxCut),
            "Q" => Ok(Self::Qubo),
            other => Err(InstanceError::UnknownFamily {
                code: other.to_owned(),
            }),
        }
    }
}
