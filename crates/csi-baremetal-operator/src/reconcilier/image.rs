use crate::crd::Image;

/// Full image reference for a container.
///
/// An image without its own registry is pulled from `global_registry`. Test clusters
/// side-load images, so the registry is dropped there.
pub fn resolve_image(image: &Image, global_registry: &str, test_env: bool) -> String {
    if test_env {
        return format!("{}:{}", image.name, image.tag);
    }
    let registry = if image.registry.is_empty() {
        global_registry
    } else {
        &image.registry
    };
    format!("{}/{}:{}", registry, image.name, image.tag)
}
