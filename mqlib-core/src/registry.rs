//! Heuristic catalogue per problem family.

use std::collections::BTreeMap;

use crate::backend::{BackendError, CatalogColumns, HeuristicBackend};
use crate::problem::ProblemFamily;

/// Heuristic codes and descriptions for each problem family.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeuristicCatalog {
    /// Max-Cut heuristics keyed by code.
    #[cfg_attr(feature = "serde", serde(rename = "MaxCut"))]
    pub max_cut: BTreeMap<String, String>,
    /// QUBO heuristics keyed by code.
    #[cfg_attr(feature = "serde", serde(rename = "QUBO"))]
    pub qubo: BTreeMap<String, String>,
}

impl HeuristicCatalog {
    /// Heuristics for one family.
    #[must_use]
    pub const fn for_family(&self, family: ProblemFamily) -> &BTreeMap<String, String> {
        match family {
            ProblemFamily::MaxCut => &self.max_cut,
            ProblemFamily::Qubo => &self.qubo,
        }
    }

    /// Whether `code` names a heuristic of either family.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.max_cut.contains_key(code) || self.qubo.contains_key(code)
    }
}

/// Ask `backend` which heuristics it offers.
///
/// The query has no side effects; repeated calls return the same catalogue
/// for a given backend.
///
/// # Errors
///
/// Returns the backend's [`BackendError`] unchanged.
pub fn list_heuristics<B>(backend: &B) -> Result<HeuristicCatalog, BackendError>
where
    B: HeuristicBackend + ?Sized,
{
    let raw = backend.heuristics()?;
    Ok(HeuristicCatalog {
        max_cut: pair_columns(ProblemFamily::MaxCut, raw.max_cut),
        qubo: pair_columns(ProblemFamily::Qubo, raw.qubo),
    })
}

fn pair_columns(family: ProblemFamily, columns: CatalogColumns) -> BTreeMap<String, String> {
    if columns.names.len() != columns.descriptions.len() {
        log::warn!(
            "solver listed {} {family} heuristics but {} descriptions",
            columns.names.len(),
            columns.descriptions.len()
        );
    }
    columns.names.into_iter().zip(columns.descriptions).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedBackend;
    use rstest::rstest;

    #[rstest]
    fn catalogue_covers_every_listed_heuristic() {
        let backend = ScriptedBackend::default()
            .with_heuristic(ProblemFamily::MaxCut, "BURER2002", "Burer et al. 2002")
            .with_heuristic(ProblemFamily::MaxCut, "FESTA2002G", "Festa et al. 2002 GRASP")
            .with_heuristic(ProblemFamily::Qubo, "PALUBECKIS2004bMST2", "Palubeckis 2004");
        let catalog = list_heuristics(&backend).expect("catalogue");
        assert_eq!(catalog.max_cut.len(), 2);
        assert_eq!(
            catalog.for_family(ProblemFamily::Qubo).get("PALUBECKIS2004bMST2"),
            Some(&"Palubeckis 2004".to_owned())
        );
        assert!(catalog.contains("BURER2002"));
        assert!(!catalog.contains("NOPE"));
    }

    #[rstest]
    fn repeated_queries_agree() {
        let backend = ScriptedBackend::default()
            .with_heuristic(ProblemFamily::MaxCut, "BURER2002", "Burer et al. 2002");
        let first = list_heuristics(&backend).expect("catalogue");
        let second = list_heuristics(&backend).expect("catalogue");
        assert_eq!(first, second);
    }
}
