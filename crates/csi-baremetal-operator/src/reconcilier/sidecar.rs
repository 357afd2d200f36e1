use crate::crd::{Image, Sidecar};

/// Returns the user override for `name`, or the operator default for it.
///
/// The first override with a matching name wins.
pub fn resolve_sidecar(
    overrides: &[Sidecar],
    name: &str,
    registry: &str,
    tag: &str,
    pull_policy: &str,
) -> Sidecar {
    overrides
        .iter()
        .find(|sidecar| sidecar.name == name)
        .cloned()
        .unwrap_or_else(|| Sidecar {
            name: name.to_string(),
            image: Image {
                name: name.to_string(),
                registry: registry.to_string(),
                tag: tag.to_string(),
                pull_policy: pull_policy.to_string(),
            },
        })
}
